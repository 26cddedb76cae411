//! Context-bound disposal and binding protocol.

use opal::{
    Binding, Buffer, BufferUsage, Capability, Context, Error, NativeCall, ObjectKind,
    RecordingApi, Region, Shader, ShaderStage, Shared, Texture, TextureFormat, TextureInfo,
};
use std::sync::Arc;

struct Fixture {
    api: Arc<RecordingApi>,
    context: Context,
}

impl Fixture {
    fn new() -> Fixture {
        let _ = tracing_subscriber::fmt::try_init();
        let api = Arc::new(RecordingApi::new());
        let context = Context::new(api.clone());
        Fixture { api, context }
    }
}

fn deletes(api: &RecordingApi, kind: ObjectKind) -> usize {
    api.calls()
        .iter()
        .filter(|c| matches!(c, NativeCall::Delete { kind: k, .. } if *k == kind))
        .count()
}

#[test]
fn dispose_requires_the_owning_context() {
    let f = Fixture::new();
    let buffer = {
        let guard = f.context.make_current().unwrap();
        Buffer::new(&guard, "vbo", 64, BufferUsage::VERTEX)
    };

    // no context current: ordinary disposal cannot release the handle
    assert!(matches!(buffer.dispose(), Err(Error::ContextRequired)));
    assert!(!buffer.is_disposed());

    // correct context current: disposal succeeds and is terminal
    let guard = f.context.make_current().unwrap();
    buffer.dispose_with(&guard).unwrap();
    assert!(buffer.is_disposed());
    assert_eq!(deletes(&f.api, ObjectKind::Buffer), 1);

    assert!(matches!(buffer.bind(&guard), Err(Error::Disposed)));
    assert!(matches!(buffer.dispose_with(&guard), Err(Error::Disposed)));
    assert!(matches!(buffer.dispose(), Err(Error::Disposed)));
    // no second native release
    assert_eq!(deletes(&f.api, ObjectKind::Buffer), 1);
}

#[test]
fn foreign_context_cannot_dispose() {
    let f = Fixture::new();
    let buffer = {
        let guard = f.context.make_current().unwrap();
        Buffer::new(&guard, "vbo", 64, BufferUsage::VERTEX)
    };

    let other = Context::new(f.api.clone());
    let guard = other.make_current().unwrap();
    assert!(matches!(
        buffer.dispose_with(&guard),
        Err(Error::ForeignContext)
    ));
    assert!(!buffer.is_disposed());
    drop(guard);

    // a context sharing the owning namespace may dispose
    let shared = Context::new_shared(&f.context);
    let guard = shared.make_current().unwrap();
    buffer.dispose_with(&guard).unwrap();
}

#[test]
fn dec_ref_releases_on_the_final_decrement() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let buffer = Buffer::new(&guard, "vbo", 16, BufferUsage::VERTEX);

    buffer.inc_ref().unwrap();
    buffer.inc_ref().unwrap();
    assert_eq!(buffer.ref_count(), 2);

    assert!(!buffer.dec_ref(&guard).unwrap());
    assert!(buffer.dec_ref(&guard).unwrap());
    assert!(buffer.is_disposed());
    assert_eq!(deletes(&f.api, ObjectKind::Buffer), 1);

    // double release tolerated
    assert!(!buffer.dec_ref(&guard).unwrap());
    assert_eq!(deletes(&f.api, ObjectKind::Buffer), 1);

    assert!(matches!(buffer.inc_ref(), Err(Error::Disposed)));
}

#[test]
fn dec_ref_without_prior_inc_disposes_immediately() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let buffer = Buffer::new(&guard, "once", 16, BufferUsage::VERTEX);
    assert!(buffer.dec_ref(&guard).unwrap());
    assert!(buffer.is_disposed());
}

#[test]
fn binding_is_orthogonal_to_lifetime() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let texture = Texture::new(
        &guard,
        "atlas",
        TextureInfo {
            width: 4,
            height: 4,
            format: TextureFormat::Rgba8,
        },
    )
    .unwrap();

    assert!(!texture.is_bound());
    texture.bind(&guard).unwrap();
    assert!(texture.is_bound());
    texture.unbind(&guard).unwrap();
    assert!(!texture.is_bound());

    // disposal while bound unbinds before the native release
    texture.bind(&guard).unwrap();
    texture.dispose_with(&guard).unwrap();
    assert!(!texture.is_bound());
    let calls = f.api.calls();
    let unbind_pos = calls
        .iter()
        .rposition(|c| matches!(c, NativeCall::Unbind { kind: ObjectKind::Texture }))
        .unwrap();
    let delete_pos = calls
        .iter()
        .position(|c| matches!(c, NativeCall::Delete { kind: ObjectKind::Texture, .. }))
        .unwrap();
    assert!(unbind_pos < delete_pos);

    assert!(matches!(texture.bind(&guard), Err(Error::Disposed)));
}

#[test]
fn upload_after_dispose_fails() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let buffer = Buffer::with_data(&guard, "vbo", BufferUsage::VERTEX, &[0u8; 8]);
    buffer.dispose_with(&guard).unwrap();
    assert!(matches!(
        buffer.upload(&guard, 0, &[1, 2]),
        Err(Error::Disposed)
    ));
}

#[test]
fn unsupported_capability_is_distinct_from_misuse() {
    let f = Fixture::new();
    f.api.disable(Capability::SingleChannelTexture);
    let guard = f.context.make_current().unwrap();
    let result = Texture::new(
        &guard,
        "coverage",
        TextureInfo {
            width: 8,
            height: 8,
            format: TextureFormat::R8,
        },
    );
    assert!(matches!(result, Err(Error::Unsupported(_))));
}

#[test]
fn shader_errors_carry_the_native_log() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    f.api.set_compile_error("0:1: syntax error");
    match Shader::compile(&guard, "glyph_vs", ShaderStage::Vertex, "void main() {") {
        Err(Error::ShaderCompilation(log)) => assert!(log.contains("syntax error")),
        other => panic!("expected a compilation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn explicit_disposal_defers_to_registered_interest() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let buffer = Buffer::new(&guard, "vbo", 64, BufferUsage::VERTEX);
    buffer.inc_ref().unwrap();
    buffer.inc_ref().unwrap();

    assert!(matches!(
        buffer.dispose_with(&guard),
        Err(Error::StillReferenced(2))
    ));
    assert!(!buffer.is_disposed());

    assert!(!buffer.dec_ref(&guard).unwrap());
    assert!(matches!(
        buffer.dispose_with(&guard),
        Err(Error::StillReferenced(1))
    ));
    assert!(buffer.dec_ref(&guard).unwrap());
    assert!(buffer.is_disposed());
}

#[test]
#[should_panic(expected = "texture upload region out of bounds")]
fn texture_upload_rejects_a_wrapping_region() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let texture = Texture::new(
        &guard,
        "atlas",
        TextureInfo {
            width: 4,
            height: 4,
            format: TextureFormat::Rgba8,
        },
    )
    .unwrap();
    // x + width wraps u32; the widened check must still reject it
    let _ = texture.upload(
        &guard,
        Region {
            x: u32::MAX,
            y: 0,
            width: 2,
            height: 2,
        },
        &[0u8; 16],
    );
}

#[test]
#[should_panic(expected = "buffer upload out of bounds")]
fn buffer_upload_rejects_a_wrapping_offset() {
    let f = Fixture::new();
    let guard = f.context.make_current().unwrap();
    let buffer = Buffer::new(&guard, "vbo", 16, BufferUsage::VERTEX);
    let _ = buffer.upload(&guard, usize::MAX, &[1, 2]);
}
