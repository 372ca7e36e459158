// field_table
/// Build a static field-accessor table for a record type.
///
/// Accessors must be non-capturing closures (or fn items) so they can
/// coerce to fn pointers in a `const` table.
#[macro_export]
macro_rules! field_table {
    ($entity:ty { $($name:ident => $get:expr),* $(,)? }) => {
        &[
            $(
                $crate::traits::FieldAccessor::<$entity> {
                    name: stringify!($name),
                    get: $get,
                },
            )*
        ]
    };
}
