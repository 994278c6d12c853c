use reqwest::Client;

/// Shared reqwest client. `allow_self_sign_cert` turns off certificate
/// verification for deployments fronted by self-signed TLS.
pub fn build_client(allow_self_sign_cert: bool) -> Result<Client, reqwest::Error> {
    Client::builder()
        .danger_accept_invalid_certs(allow_self_sign_cert)
        .build()
}

/// Join a service base url and a path without doubling slashes.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("http://h:1", "v1/list"), "http://h:1/v1/list");
        assert_eq!(join_url("http://h:1/", "/v1/list"), "http://h:1/v1/list");
    }
}
