// macro and utils

// HashMap macro to build name -> Binding maps easily (mostly for tests)
#[macro_export]
macro_rules! bindings {
    ( $( $k:expr => $v:expr ),* $(,)? ) => {
        {
            let mut temp_map = std::collections::HashMap::new();
            $(
                temp_map.insert(String::from($k), $v);
            )*
            temp_map
        }
    };
}
