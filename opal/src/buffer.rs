use crate::api::{BufferUsage, ObjectKind};
use crate::context::CurrentContext;
use crate::error::{Error, Result};

context_object! {
    /// A native buffer object.
    pub struct Buffer {
        byte_size: usize,
    }
}
impl_binding!(Buffer);

impl Buffer {
    /// Allocates an uninitialized buffer.
    pub fn new(
        context: &CurrentContext,
        label: impl Into<String>,
        byte_size: usize,
        usage: BufferUsage,
    ) -> Buffer {
        let raw = context.api().create_buffer(byte_size, usage);
        Buffer {
            core: crate::resource::ResourceCore::new(context, ObjectKind::Buffer, label, raw),
            byte_size,
        }
    }

    /// Allocates a buffer and uploads `data` into it.
    pub fn with_data(
        context: &CurrentContext,
        label: impl Into<String>,
        usage: BufferUsage,
        data: &[u8],
    ) -> Buffer {
        let buffer = Buffer::new(context, label, data.len(), usage);
        let raw = buffer.core.raw().unwrap();
        context.api().upload_buffer(raw, 0, data);
        buffer
    }

    /// Size of the buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Uploads `data` at `offset`. The range must lie inside the buffer.
    pub fn upload(&self, context: &CurrentContext, offset: usize, data: &[u8]) -> Result<()> {
        if context.share_group() != self.core.share_group() {
            return Err(Error::ForeignContext);
        }
        let raw = self.core.raw()?;
        assert!(
            offset
                .checked_add(data.len())
                .map_or(false, |end| end <= self.byte_size),
            "buffer upload out of bounds"
        );
        context.api().upload_buffer(raw, offset, data);
        Ok(())
    }
}
