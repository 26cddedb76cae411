//! Object layer over a native 3D graphics API.
//!
//! Managed wrappers (buffers, textures, shaders) own native object names
//! with reference-counted lifetimes tied to a [`Context`]. Disposal is
//! contextual: releasing a native handle is only valid while a context of
//! the owning share group is current, which the [`CurrentContext`] guard
//! enforces at the type level.

#[macro_use]
mod handle;

pub mod api;
mod binding;
mod buffer;
mod context;
mod draw;
mod error;
pub mod recording;
mod refcount;
pub(crate) mod resource;
mod shader;
mod texture;

pub use crate::api::{
    BufferUsage, Capability, NativeApi, ObjectKind, RawName, Region, ShaderStage, TextureFormat,
    TextureInfo,
};
pub use crate::binding::Binding;
pub use crate::buffer::Buffer;
pub use crate::context::{Context, CurrentContext, ShareGroup};
pub use crate::draw::{Color, DrawCmd, DrawSource};
pub use crate::error::{Error, Result};
pub use crate::recording::{NativeCall, RecordingApi};
pub use crate::refcount::RefCount;
pub use crate::resource::Shared;
pub use crate::shader::{Program, Shader};
pub use crate::texture::Texture;
