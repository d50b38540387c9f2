/// Builds a [`Table`](crate::Table) or [`Value`](crate::Value) from SCF-like
/// literal syntax.
///
/// A braced body produces a `Table` with entries in the order written;
/// anything else produces a `Value`. Keys may repeat, as in parsed input.
///
/// # Examples
///
/// ```rust
/// use scf::{scf, Table, Value};
///
/// let table = scf!({
///     "title": "demo",
///     "window": { "width": 640, "vsync": true },
///     "icon": nil
/// });
/// assert_eq!(table.keys().collect::<Vec<_>>(), ["title", "window", "icon"]);
///
/// assert_eq!(scf!({}), Table::new());
/// assert_eq!(scf!(1.5), Value::F32(1.5));
/// ```
#[macro_export]
macro_rules! scf {
    (nil) => {
        $crate::Value::Nil
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ({}) => {
        $crate::Table::new()
    };

    ({ $($body:tt)+ }) => {{
        let mut table = $crate::Table::new();
        $crate::scf!(@entries table; $($body)+);
        table
    }};

    // Entries, one at a time. A negative literal spans two tokens.
    (@entries $table:ident;) => {};

    (@entries $table:ident; $key:literal : - $value:tt $(, $($rest:tt)*)?) => {
        $table.add($key, $crate::scf!(-$value));
        $crate::scf!(@entries $table; $($($rest)*)?);
    };

    (@entries $table:ident; $key:literal : $value:tt $(, $($rest:tt)*)?) => {
        $table.add($key, $crate::scf!($value));
        $crate::scf!(@entries $table; $($($rest)*)?);
    };

    // Any other expression convertible into a value
    ($e:expr) => {
        $crate::Value::from($e)
    };
}
