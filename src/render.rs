//! Value rendering for the `[k=v, ...]` text form of a table.
//!
//! Values go through `RenderValue` rather than `Display` so that nullable
//! values (`Option<T>`) have a rendering: `None` prints as `null`.

use core::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// How a stored value is written inside a table's text form.
///
/// Implemented for the standard scalar and string types, for `Option<T>`,
/// and through references and smart pointers. Other value types can
/// delegate to their `Display` impl.
pub trait RenderValue {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

macro_rules! render_via_display {
    ( $( $t:ty ),* $(,)? ) => {
        $(
            impl RenderValue for $t {
                fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }
            }
        )*
    };
}

render_via_display!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str,
    String,
);

impl<T: RenderValue> RenderValue for Option<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(v) => v.render(f),
            None => f.write_str("null"),
        }
    }
}

impl<T: RenderValue + ?Sized> RenderValue for &T {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).render(f)
    }
}

impl<T: RenderValue + ?Sized> RenderValue for Box<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).render(f)
    }
}

impl<T: RenderValue + ?Sized> RenderValue for Rc<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).render(f)
    }
}

impl<T: RenderValue + ?Sized> RenderValue for Arc<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).render(f)
    }
}
