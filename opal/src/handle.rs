//! Macros generating the common surface of context-bound object types.

/// Declares a wrapper over [`ResourceCore`](crate::resource::ResourceCore)
/// and wires up the [`Shared`](crate::Shared) contract.
macro_rules! context_object {
    ($(#[$meta:meta])* $v:vis struct $name:ident { $($field:ident: $fty:ty),* $(,)? }) => {
        $(#[$meta])*
        $v struct $name {
            pub(crate) core: $crate::resource::ResourceCore,
            $($field: $fty,)*
        }

        impl $name {
            /// The native name of this object, while it is alive.
            $v fn raw(&self) -> $crate::error::Result<$crate::api::RawName> {
                self.core.raw()
            }

            /// The share group that owns this object.
            $v fn share_group(&self) -> $crate::context::ShareGroup {
                self.core.share_group()
            }

            /// Debug label given at creation.
            $v fn label(&self) -> &str {
                self.core.label()
            }
        }

        impl $crate::resource::Shared for $name {
            fn ref_count(&self) -> u32 {
                self.core.ref_count()
            }

            fn is_disposed(&self) -> bool {
                self.core.is_disposed()
            }

            fn inc_ref(&self) -> $crate::error::Result<u32> {
                self.core.inc_ref()
            }

            fn dec_ref(
                &self,
                context: &$crate::context::CurrentContext,
            ) -> $crate::error::Result<bool> {
                self.core.dec_ref(context)
            }

            fn dispose(&self) -> $crate::error::Result<()> {
                self.core.dispose()
            }

            fn dispose_with(
                &self,
                context: &$crate::context::CurrentContext,
            ) -> $crate::error::Result<()> {
                self.core.dispose_with(context)
            }
        }
    };
}

/// Implements the [`Binding`](crate::Binding) capability by delegation.
macro_rules! impl_binding {
    ($name:ident) => {
        impl $crate::binding::Binding for $name {
            fn bind(&self, context: &$crate::context::CurrentContext) -> $crate::error::Result<()> {
                self.core.bind(context)
            }

            fn unbind(
                &self,
                context: &$crate::context::CurrentContext,
            ) -> $crate::error::Result<()> {
                self.core.unbind(context)
            }

            fn is_bound(&self) -> bool {
                self.core.is_bound()
            }
        }
    };
}
