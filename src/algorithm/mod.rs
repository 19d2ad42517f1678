/// Assembly state machine, stop conditions and the run loop
pub mod assembly;
/// First-writer-wins compositing of patches onto the canvas
pub mod compositor;
/// Patch extraction from segmented images
pub mod extraction;
/// Patch and position selection policies
pub mod placement;
