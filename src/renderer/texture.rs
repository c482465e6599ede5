use image::RgbaImage;
use wgpu::util::DeviceExt;

/// A sampled RGBA texture resident on the GPU.
pub struct GpuTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        // An empty image still needs one texel of data.
        let fallback = [255u8; 4];
        let data: &[u8] = if image.is_empty() { &fallback } else { image.as_raw() };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Pixel art and UI slices: no filtering between neighbouring frames.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { view, sampler, width: size.width, height: size.height }
    }

    /// 1×1 opaque white, sampled by untextured fills.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        Self::from_image(device, queue, "solid_white", &image)
    }
}
