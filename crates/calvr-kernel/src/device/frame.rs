/// One acquired surface texture with its view and command encoder.
///
/// Hand it back to [`Gpu::submit`](super::Gpu::submit) promptly; holding it
/// blocks acquisition of the next frame.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
