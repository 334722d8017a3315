/// Builds [`Parameters`](crate::params::Parameters) from `key => value` pairs of mixed
/// scalar types.
///
/// ## Example
///
/// ```
/// use l2l_dispatch::params;
///
/// let p = params! {
///     "active" => true,
///     "limit" => 2,
///     "linecode" => "LINE-1",
/// };
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! params {
    ($($k:expr => $v:expr),* $(,)?) => {{
        $crate::params::Parameters::new()$(.param($k, $v))*
    }};
}

/// Implements [`ApiResource`](crate::traits::ApiResource) for a model listed at `path`.
///
/// ## Example
///
/// ```
/// use l2l_dispatch::api_resource;
///
/// #[derive(serde::Deserialize, Clone)]
/// pub struct Shift {
///     pub id: i64,
/// }
///
/// api_resource!(Shift, "shifts/");
/// ```
#[macro_export]
macro_rules! api_resource {
    ($name:ty, $path:literal) => {
        impl $crate::traits::ApiResource for $name {
            const PATH: &'static str = $path;
        }
    };
}
