mod http;
#[cfg(test)]
pub(crate) mod testing;
mod vars;

pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use vars::Vars;
