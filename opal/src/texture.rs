use crate::api::{Capability, ObjectKind, Region, TextureFormat, TextureInfo};
use crate::context::CurrentContext;
use crate::error::{Error, Result};

context_object! {
    /// A native texture object.
    pub struct Texture {
        info: TextureInfo,
    }
}
impl_binding!(Texture);

impl Texture {
    /// Allocates texture storage. Single-channel formats require the
    /// corresponding native capability.
    pub fn new(
        context: &CurrentContext,
        label: impl Into<String>,
        info: TextureInfo,
    ) -> Result<Texture> {
        if info.format == TextureFormat::R8
            && !context.api().supports(Capability::SingleChannelTexture)
        {
            return Err(Error::Unsupported("single-channel texture storage"));
        }
        let raw = context.api().create_texture(&info);
        Ok(Texture {
            core: crate::resource::ResourceCore::new(context, ObjectKind::Texture, label, raw),
            info,
        })
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn format(&self) -> TextureFormat {
        self.info.format
    }

    /// Uploads texel data into a region. `data` must cover the region
    /// exactly at the texture's format.
    pub fn upload(&self, context: &CurrentContext, region: Region, data: &[u8]) -> Result<()> {
        if context.share_group() != self.core.share_group() {
            return Err(Error::ForeignContext);
        }
        let raw = self.core.raw()?;
        // widened so oversized coordinates cannot wrap past the check
        assert!(
            region.x as u64 + region.width as u64 <= self.info.width as u64
                && region.y as u64 + region.height as u64 <= self.info.height as u64,
            "texture upload region out of bounds"
        );
        assert_eq!(
            data.len() as u64,
            region.width as u64 * region.height as u64 * self.info.format.byte_size() as u64,
            "texel data size mismatch"
        );
        context.api().upload_texture(raw, region, data);
        Ok(())
    }
}
