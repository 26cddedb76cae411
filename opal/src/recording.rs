//! A headless native backend that records every call it receives.
//!
//! Stands in for a real driver in tests and benches, and doubles as a
//! debugging aid: the recorded call stream shows exactly what the object
//! layer asked the native API to do, in order.

use crate::api::{
    BufferUsage, Capability, NativeApi, ObjectKind, RawName, Region, ShaderStage, TextureFormat,
    TextureInfo,
};
use crate::draw::DrawCmd;
use crate::error::Error;
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// One recorded native call.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeCall {
    CreateBuffer {
        name: RawName,
        byte_size: usize,
        usage: BufferUsage,
    },
    UploadBuffer {
        buffer: RawName,
        offset: usize,
        byte_len: usize,
    },
    CreateTexture {
        name: RawName,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    UploadTexture {
        texture: RawName,
        region: Region,
    },
    CompileShader {
        name: RawName,
        stage: ShaderStage,
    },
    LinkProgram {
        name: RawName,
    },
    Bind {
        kind: ObjectKind,
        name: RawName,
    },
    Unbind {
        kind: ObjectKind,
    },
    Delete {
        kind: ObjectKind,
        name: RawName,
    },
    Draw(DrawCmd),
}

/// Recording [`NativeApi`] implementation. Object names are handed out
/// sequentially; capabilities can be switched off to exercise
/// unsupported-configuration paths.
pub struct RecordingApi {
    next_name: AtomicU32,
    calls: Mutex<Vec<NativeCall>>,
    disabled: Mutex<HashSet<Capability>>,
    compile_error: Mutex<Option<String>>,
}

impl RecordingApi {
    pub fn new() -> RecordingApi {
        RecordingApi {
            next_name: AtomicU32::new(1),
            calls: Mutex::new(Vec::new()),
            disabled: Mutex::new(HashSet::new()),
            compile_error: Mutex::new(None),
        }
    }

    /// Marks `cap` as unsupported.
    pub fn disable(&self, cap: Capability) {
        self.disabled.lock().unwrap().insert(cap);
    }

    /// Makes the next shader compilation fail with `log`.
    pub fn set_compile_error(&self, log: impl Into<String>) {
        *self.compile_error.lock().unwrap() = Some(log.into());
    }

    /// Snapshot of the recorded call stream.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The recorded draws, in submission order.
    pub fn draws(&self) -> Vec<DrawCmd> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                NativeCall::Draw(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn fresh_name(&self) -> RawName {
        NonZeroU32::new(self.next_name.fetch_add(1, Ordering::Relaxed)).unwrap()
    }

    fn record(&self, call: NativeCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for RecordingApi {
    fn default() -> Self {
        RecordingApi::new()
    }
}

impl NativeApi for RecordingApi {
    fn supports(&self, cap: Capability) -> bool {
        !self.disabled.lock().unwrap().contains(&cap)
    }

    fn create_buffer(&self, byte_size: usize, usage: BufferUsage) -> RawName {
        let name = self.fresh_name();
        self.record(NativeCall::CreateBuffer {
            name,
            byte_size,
            usage,
        });
        name
    }

    fn upload_buffer(&self, buffer: RawName, offset: usize, data: &[u8]) {
        self.record(NativeCall::UploadBuffer {
            buffer,
            offset,
            byte_len: data.len(),
        });
    }

    fn create_texture(&self, info: &TextureInfo) -> RawName {
        let name = self.fresh_name();
        self.record(NativeCall::CreateTexture {
            name,
            width: info.width,
            height: info.height,
            format: info.format,
        });
        name
    }

    fn upload_texture(&self, texture: RawName, region: Region, _data: &[u8]) {
        self.record(NativeCall::UploadTexture { texture, region });
    }

    fn compile_shader(&self, stage: ShaderStage, _source: &str) -> Result<RawName, Error> {
        if let Some(log) = self.compile_error.lock().unwrap().take() {
            return Err(Error::ShaderCompilation(log));
        }
        let name = self.fresh_name();
        self.record(NativeCall::CompileShader { name, stage });
        Ok(name)
    }

    fn link_program(&self, _shaders: &[RawName]) -> Result<RawName, Error> {
        let name = self.fresh_name();
        self.record(NativeCall::LinkProgram { name });
        Ok(name)
    }

    fn bind(&self, kind: ObjectKind, name: RawName) {
        self.record(NativeCall::Bind { kind, name });
    }

    fn unbind(&self, kind: ObjectKind) {
        self.record(NativeCall::Unbind { kind });
    }

    fn delete(&self, kind: ObjectKind, name: RawName) {
        self.record(NativeCall::Delete { kind, name });
    }

    fn draw(&self, cmd: &DrawCmd) {
        self.record(NativeCall::Draw(*cmd));
    }
}
