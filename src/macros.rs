/// Generates the per-request option setters shared by every operation.
/// Currently only the timeout can be set per request.
#[macro_export]
macro_rules! add_per_request_options {
    ($type_name:ty) => {
        impl $type_name {
            /// Set the timeout for this operation, in milliseconds.
            pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
                self.client.options.timeout_ms = Some(timeout_ms);
                self
            }

            /// If the [`InfluxClient`](`crate::InfluxClient`) carries a
            /// timeout, disable it for this operation.
            pub fn no_timeout(mut self) -> Self {
                self.client.options.timeout_ms = None;
                self
            }
        }
    };
}
