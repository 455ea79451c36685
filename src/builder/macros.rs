//! Macros for declaring state hierarchies.

/// Declare one or more `static` [`State`](crate::core::State) items.
///
/// The display name defaults to the static's identifier.
///
/// # Example
///
/// ```
/// use hsm::core::{Signal, SignalStatus, StateHandler};
/// use hsm::hsm_state;
/// use hsm::machine::Context;
///
/// struct Idle;
///
/// impl StateHandler for Idle {
///     fn on_signal(&self, _ctx: &mut Context<'_>, _signal: Signal) -> SignalStatus {
///         SignalStatus::NotHandled
///     }
/// }
///
/// hsm_state! {
///     pub static ROOT {
///         id: 0,
///         handler: Idle,
///     }
///
///     static CHILD {
///         name: "Child",
///         id: 1,
///         parent: ROOT,
///         handler: Idle,
///     }
/// }
///
/// assert_eq!(ROOT.name(), "ROOT");
/// assert_eq!(CHILD.name(), "Child");
/// assert!(CHILD.parent().is_some_and(|p| p.is(&ROOT)));
/// ```
#[macro_export]
macro_rules! hsm_state {
    (@name $ident:ident) => {
        stringify!($ident)
    };
    (@name $ident:ident $label:expr) => {
        $label
    };
    (@parent) => {
        None
    };
    (@parent $parent:path) => {
        Some(&$parent)
    };
    (
        $(
            $(#[$meta:meta])*
            $vis:vis static $state:ident {
                $(name: $label:expr,)?
                id: $id:expr,
                $(parent: $parent:path,)?
                handler: $handler:expr $(,)?
            }
        )+
    ) => {
        $(
            $(#[$meta])*
            $vis static $state: $crate::core::State = $crate::core::State::new(
                $crate::hsm_state!(@name $state $($label)?),
                $id,
                $crate::hsm_state!(@parent $($parent)?),
                &$handler,
            );
        )+
    };
}
