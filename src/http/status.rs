//! Status code helpers and the reason phrase table.

/// Returns `true` for the status codes the redirect state machine follows.
pub fn is_redirect_code(code: u16) -> bool {
    matches!(code, 301 | 302 | 303 | 307 | 308)
}

/// Returns `true` for the edge-proxy error band (520-527).
pub fn is_edge_proxy_error_code(code: u16) -> bool {
    (520..=527).contains(&code)
}

/// Looks up the human-readable reason phrase for a status code.
///
/// Covers the registered codes plus the vendor ranges proxies commonly emit
/// (nginx 444/494-499, edge-proxy 520-527, 529, 530, 598, 599).
///
/// # Returns
///
/// The phrase, or `None` for unknown codes.
pub fn reason_phrase_for_code(code: u16) -> Option<&'static str> {
    let phrase = match code {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",

        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",

        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",

        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",

        // nginx
        444 => "nginx: No Response",
        494 => "nginx: Request Header Too Large",
        495 => "nginx: SSL Certificate Error",
        496 => "nginx: SSL Certificate Required",
        497 => "nginx: HTTP Request Sent To HTTPS Port",
        499 => "nginx: Client Closed Request",

        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        509 => "Bandwidth Limit Exceeded",
        510 => "Not Extended",
        511 => "Network Authentication Required",

        // edge proxy
        520 => "Cloudflare: Web Server Returned An Unknown Error",
        521 => "Cloudflare: Web Server Is Down",
        522 => "Cloudflare: Connection Timed Out",
        523 => "Cloudflare: Origin Is Unreachable",
        524 => "Cloudflare: A Timeout Occurred",
        525 => "Cloudflare: SSL Handshake Failed",
        526 => "Cloudflare: Invalid SSL Certificate",
        527 => "Cloudflare: Railgun Error",

        529 => "Qualys: Site Is Overloaded",
        530 => "Pantheon: Site Is Frozen",

        598 => "Network Read Timeout Error",
        599 => "Network Connect Timeout Error",
        _ => return None,
    };
    Some(phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_codes() {
        for code in [301, 302, 303, 307, 308] {
            assert!(is_redirect_code(code), "{} should redirect", code);
        }
        for code in [200, 300, 304, 305, 404] {
            assert!(!is_redirect_code(code), "{} should not redirect", code);
        }
    }

    #[test]
    fn test_edge_proxy_band() {
        assert!(!is_edge_proxy_error_code(519));
        assert!(is_edge_proxy_error_code(520));
        assert!(is_edge_proxy_error_code(527));
        assert!(!is_edge_proxy_error_code(528));
    }

    #[test]
    fn test_reason_phrases() {
        assert_eq!(reason_phrase_for_code(200), Some("OK"));
        assert_eq!(reason_phrase_for_code(418), Some("I'm a teapot"));
        assert_eq!(reason_phrase_for_code(499), Some("nginx: Client Closed Request"));
        assert_eq!(
            reason_phrase_for_code(521),
            Some("Cloudflare: Web Server Is Down")
        );
        assert_eq!(reason_phrase_for_code(299), None);
    }
}
