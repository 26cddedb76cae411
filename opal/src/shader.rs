use crate::api::{ObjectKind, ShaderStage};
use crate::context::CurrentContext;
use crate::error::Result;

context_object! {
    /// A compiled shader stage.
    pub struct Shader {
        stage: ShaderStage,
    }
}

context_object! {
    /// A linked shader program.
    pub struct Program {}
}
impl_binding!(Program);

impl Shader {
    /// Compiles a stage from source. On failure the error carries the
    /// native info log.
    pub fn compile(
        context: &CurrentContext,
        label: impl Into<String>,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Shader> {
        let raw = context.api().compile_shader(stage, source)?;
        Ok(Shader {
            core: crate::resource::ResourceCore::new(context, ObjectKind::Shader, label, raw),
            stage,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Program {
    /// Links compiled stages. On failure the error carries the native
    /// info log.
    pub fn link(
        context: &CurrentContext,
        label: impl Into<String>,
        vertex: &Shader,
        fragment: &Shader,
    ) -> Result<Program> {
        let stages = [vertex.core.raw()?, fragment.core.raw()?];
        let raw = context.api().link_program(&stages)?;
        Ok(Program {
            core: crate::resource::ResourceCore::new(context, ObjectKind::Program, label, raw),
        })
    }
}
