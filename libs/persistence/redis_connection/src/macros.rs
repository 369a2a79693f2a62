/// Declares a zero-sized cache key type.
///
/// ```ignore
/// cache_key!(UserCacheKey::<User> => "user:{}"[id: i64]);
/// cache_key!(UserListCacheKey::<Vec<User>> => "users:list");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($name:ident::<$t:ty> => $format_key:literal[$($arg:ident:$ty:ty),*]) => {
        #[doc=concat!(concat!("Cache key binding\n ## Key \n", $format_key), concat!("\n ## Value Type \n ", stringify!($t)))]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ($(&'r $ty,)*);
            type Value = $t;

            fn get_key_with_args(&self, args: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                let ($($arg,)*) = args;

                (format!($format_key, $($arg),*)).into()
            }
        }
    };
    ($name:ident::<$t:ty> => $key:literal) => {
        #[doc=concat!(concat!("Cache key binding\n ## Key \n", $key), concat!("\n ## Value Type \n ", stringify!($t)))]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::core::key::CacheKey for $name {
            type Args<'r> = ();
            type Value = $t;

            fn get_key_with_args(&self, _: Self::Args<'_>) -> std::borrow::Cow<'static, str> {
                ($key).into()
            }
        }
    };
}
