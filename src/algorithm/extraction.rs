//! Cutting segmented images into transparency-masked patches

use log::debug;
use ndarray::{ArrayView3, Axis, Zip};

use crate::analysis::labels::LabelMap;
use crate::analysis::segmentation::SlicSegmenter;
use crate::io::error::{Result, invalid_source};
use crate::spatial::bounds::crop_to_content;
use crate::spatial::patch::{Patch, PatchPool};
use crate::spatial::raster::{Channel, Raster, with_alpha};

/// Produce one patch per distinct label of `labels`
///
/// For every label the image is augmented with an opaque alpha channel,
/// every channel of non-member pixels is zeroed, and the result is cropped
/// to the tight box around the members. Labels are taken from the values
/// actually present, so sparse numbering loses no cluster.
///
/// # Errors
///
/// Returns `InvalidSourceData` if the label map and image sizes differ or
/// the image has fewer than three channels.
pub fn extract_patches<T: Channel>(
    image: ArrayView3<'_, T>,
    labels: &LabelMap,
) -> Result<Vec<Patch<T>>> {
    let (rows, cols, _) = image.dim();
    if labels.dim() != (rows, cols) {
        let (label_rows, label_cols) = labels.dim();
        return Err(invalid_source(&format!(
            "label map is {label_rows}x{label_cols} but image is {rows}x{cols}"
        )));
    }

    let augmented = with_alpha(image)?;
    let mut patches = Vec::new();

    for label in labels.distinct_labels() {
        let mut masked = augmented.clone();
        Zip::from(masked.lanes_mut(Axis(2)))
            .and(labels.as_array())
            .for_each(|mut pixel, &pixel_label| {
                if pixel_label != label {
                    pixel.fill(T::zero());
                }
            });

        match crop_to_content(masked.view()) {
            Ok(cropped) => patches.push(Patch::new(cropped, label)?),
            Err(error) => debug!("Skipping label {label}: {error}"),
        }
    }

    Ok(patches)
}

/// Segments images and collects their patches into one pool
#[derive(Clone, Debug, Default)]
pub struct PatchExtractor {
    segmenter: SlicSegmenter,
}

impl PatchExtractor {
    /// Create an extractor around a configured segmenter
    pub const fn new(segmenter: SlicSegmenter) -> Self {
        Self { segmenter }
    }

    /// Segmenter used for every image
    pub const fn segmenter(&self) -> &SlicSegmenter {
        &self.segmenter
    }

    /// Segment one image and cut it into patches
    ///
    /// # Errors
    ///
    /// Propagates errors from [`extract_patches`].
    pub fn extract<T: Channel>(&self, image: ArrayView3<'_, T>) -> Result<Vec<Patch<T>>> {
        let labels = self.segmenter.segment(image.view());
        debug!(
            "Segmented {}x{} image into {} clusters",
            image.dim().0,
            image.dim().1,
            labels.label_count()
        );
        let patches = extract_patches(image, &labels)?;
        let off_center = patches.iter().filter(|patch| !patch.covers_center()).count();
        if off_center > 0 {
            debug!("{off_center} of {} patches do not cover their own center", patches.len());
        }
        Ok(patches)
    }

    /// Build the patch pool from a sequence of images
    ///
    /// `on_image` is called after each image with its index and the number of
    /// patches it contributed.
    ///
    /// # Errors
    ///
    /// Returns the first error produced while loading or extracting an image.
    pub fn build_pool<T, I, F>(&self, images: I, mut on_image: F) -> Result<PatchPool<T>>
    where
        T: Channel,
        I: IntoIterator<Item = Result<Raster<T>>>,
        F: FnMut(usize, usize),
    {
        let mut pool = PatchPool::default();
        for (index, image) in images.into_iter().enumerate() {
            let patches = self.extract(image?.view())?;
            on_image(index, patches.len());
            pool.extend(patches);
        }
        Ok(pool)
    }
}
