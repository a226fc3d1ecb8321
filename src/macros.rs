/// Declare a settings struct and its [`Settings`](crate::Settings) impl in one
/// place.
///
/// Each field is introduced by its kind (`scalar`, `nested` or `collection`),
/// may be renamed for documents with `as "Name"`, and, for scalars, may carry a
/// default literal after `=`:
///
/// ```ignore
/// settings! {
///     #[derive(Debug)]
///     pub struct Greeter {
///         pub scalar greeting as "Greeting": String = "Hello",
///         pub scalar count as "Count": i32,
///         pub nested database: Database,
///         pub collection mirrors: Vec<Mirror>,
///     }
/// }
/// ```
///
/// Fields are declared in the order written. The macro also implements
/// `Default` through [`Settings::create`](crate::Settings::create), so don't
/// derive it.
#[macro_export]
macro_rules! settings {
    (@blank scalar $ty:ty) => {
        <$ty as ::core::default::Default>::default()
    };
    (@blank nested $ty:ty) => {
        <$ty as $crate::Settings>::blank()
    };
    (@blank collection $ty:ty) => {
        <$ty as ::core::default::Default>::default()
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $kind:ident $field:ident $(as $rename:literal)?
                    : $ty:ty $(= $default:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Settings for $name {
            fn blank() -> Self {
                Self {
                    $( $field: $crate::settings!(@blank $kind $ty), )*
                }
            }

            #[allow(unused_variables)]
            fn declare(properties: &mut $crate::Properties<Self>) {
                $(
                    properties
                        .$kind(stringify!($field), |s| &s.$field, |s| &mut s.$field)
                        $(.rename($rename))?
                        $(.default($default))?;
                )*
            }
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                <Self as $crate::Settings>::create()
            }
        }
    };
}
