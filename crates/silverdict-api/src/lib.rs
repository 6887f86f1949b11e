mod client;
mod error;
mod lookup;
mod management;

pub use client::ApiClient;
pub use error::ApiError;
pub use lookup::LookupApi;
pub use management::ManagementApi;

/// Both halves of the backend, as one object
pub trait SilverDictApi: LookupApi + ManagementApi {}

impl<T: LookupApi + ManagementApi> SilverDictApi for T {}
