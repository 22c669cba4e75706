/// Host of the UmmahMap server, set with `UMMAHMAP_SERVER_HOST` when building
const fn server_host() -> &'static str {
    if let Some(host) = option_env!("UMMAHMAP_SERVER_HOST") {
        host
    } else {
        "localhost"
    }
}

/// Port from `UMMAHMAP_SERVER_PORT`, defaults to the port the server listens on without `$PORT`
const fn server_port() -> u16 {
    if let Some(port) = option_env!("UMMAHMAP_SERVER_PORT") {
        const_str::parse!(port, u16)
    } else {
        5000
    }
}

/// Whether to use https, `UMMAHMAP_SERVER_SECURE=true` or `1` for deployments behind TLS
const fn server_secure() -> bool {
    if let Some(secure) = option_env!("UMMAHMAP_SERVER_SECURE") {
        const_str::eq_ignore_ascii_case!(secure, "true") || const_str::equal!(secure, "1")
    } else {
        false
    }
}

const fn server_http_proto() -> &'static str {
    if server_secure() { "https" } else { "http" }
}

const SERVER_HOST: &str = server_host();
const SERVER_PORT: u16 = server_port();
const SERVER_HTTP_PROTO: &str = server_http_proto();

const SERVER_SOCKET: &str = const_str::concat!(SERVER_HOST, ":", SERVER_PORT);

/// Base URL of the UmmahMap API, baked in at compile time
pub const SERVER_HTTP_URL: &str = const_str::concat!(SERVER_HTTP_PROTO, "://", SERVER_SOCKET);
