//! The seam between the object layer and the native 3D API.
//!
//! The core never links a driver directly. Everything that touches native
//! state goes through a [`NativeApi`] object owned by a [`Context`]: object
//! creation, data upload, bind/unbind, deletion and draws. Implementations
//! are expected to be cheap call-forwarders; all calls either succeed or
//! indicate a programming error, never a transient fault.
//!
//! [`Context`]: crate::Context

use crate::draw::DrawCmd;
use crate::error::Error;
use std::num::NonZeroU32;

/// Name of a native object. Native APIs reserve zero as "no object", so the
/// name of a live object is always non-zero.
pub type RawName = NonZeroU32;

/// The kind of native object a name refers to. Names live in per-kind
/// namespaces, like GL object names do.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Buffer,
    Texture,
    Shader,
    Program,
}

/// Shader stages this layer knows how to compile.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

bitflags::bitflags! {
    /// Intended usage of a buffer, passed to the native allocation call.
    pub struct BufferUsage: u32 {
        const VERTEX = 0b001;
        const INDEX = 0b010;
        const UPLOAD_DST = 0b100;
    }
}

/// Texel formats used by the font engine and texture wrapper.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TextureFormat {
    /// Single-channel coverage, one byte per texel.
    R8,
    /// Four channels, one byte each.
    Rgba8,
}

impl TextureFormat {
    /// Size of one texel in bytes.
    pub fn byte_size(&self) -> usize {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// Parameters of a newly created texture.
#[derive(Copy, Clone, Debug)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// A rectangular region of a texture, used for sub-image uploads.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Optional native features. Queried before configuring anything that
/// depends on them, so capability gaps surface as [`Error::Unsupported`]
/// rather than as undefined native behavior.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Capability {
    /// Single-channel (R8) texture storage.
    SingleChannelTexture,
    /// 32-bit index buffers.
    IndexU32,
}

/// The native graphics API.
///
/// One `NativeApi` backs every context in a share group; the same object
/// names are valid across all of them.
pub trait NativeApi: Send + Sync {
    /// Whether the native implementation supports `cap`.
    fn supports(&self, cap: Capability) -> bool;

    /// Allocates buffer storage and returns its name.
    fn create_buffer(&self, byte_size: usize, usage: BufferUsage) -> RawName;

    /// Uploads `data` at `offset` into a buffer.
    fn upload_buffer(&self, buffer: RawName, offset: usize, data: &[u8]);

    /// Allocates texture storage and returns its name.
    fn create_texture(&self, info: &TextureInfo) -> RawName;

    /// Uploads texel data into a region of a texture.
    fn upload_texture(&self, texture: RawName, region: Region, data: &[u8]);

    /// Compiles a shader stage from source. On failure, the error carries
    /// the native info log.
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<RawName, Error>;

    /// Links compiled stages into a program. On failure, the error carries
    /// the native info log.
    fn link_program(&self, shaders: &[RawName]) -> Result<RawName, Error>;

    /// Binds an object to its kind's target.
    fn bind(&self, kind: ObjectKind, name: RawName);

    /// Unbinds whatever is bound to `kind`'s target.
    fn unbind(&self, kind: ObjectKind);

    /// Releases a native object. The name must not be used afterwards.
    fn delete(&self, kind: ObjectKind, name: RawName);

    /// Issues one draw.
    fn draw(&self, cmd: &DrawCmd);
}
