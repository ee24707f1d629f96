//! Rust backend: an integration-test file driving `reqwest::blocking`.
//!
//! The emitted file expects `reqwest` with the `blocking` feature as a
//! dev-dependency of the crate it is dropped into.

use super::*;

const INDENT: &str = "    ";

/// Writes a Rust integration-test file.
#[derive(Debug, Default)]
pub struct RustWriter;

impl RustWriter {
    pub fn new() -> Self {
        Self
    }
}

fn url_expr(url: &UrlExpr) -> String {
    match url {
        UrlExpr::Relative(path) => format!("format!(\"{{}}{{}}\", BASE, \"{}\")", path),
        UrlExpr::Absolute(url) => format!("\"{}\"", url),
    }
}

fn client_method(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "get",
        HttpMethod::Post => "post",
        HttpMethod::Put => "put",
        HttpMethod::Delete => "delete",
    }
}

impl TargetWriter for RustWriter {
    fn preamble(&mut self, out: &mut String, suite: &SuiteHeader) {
        out.push_str("// Generated by testlang. Do not edit.\n");
        out.push_str("#![allow(non_snake_case)]\n\n");
        out.push_str("use std::sync::OnceLock;\n");
        out.push_str("use std::time::Duration;\n\n");
        out.push_str("use reqwest::blocking::{Client, RequestBuilder};\n");
        out.push_str("use reqwest::header::{HeaderMap, HeaderName, HeaderValue};\n\n");

        out.push_str(&format!("const BASE: &str = \"{}\";\n\n", suite.base_url));

        out.push_str("struct Suite {\n");
        out.push_str("    client: Client,\n");
        out.push_str("    default_headers: HeaderMap,\n");
        out.push_str("}\n\n");

        out.push_str("struct Captured {\n");
        out.push_str("    status: u16,\n");
        out.push_str("    headers: HeaderMap,\n");
        out.push_str("    body: String,\n");
        out.push_str("}\n\n");

        out.push_str("impl Captured {\n");
        out.push_str("    /// First value of a response header, or \"\" when absent.\n");
        out.push_str("    fn header(&self, name: &str) -> &str {\n");
        out.push_str("        self.headers\n");
        out.push_str("            .get(name)\n");
        out.push_str("            .and_then(|v| v.to_str().ok())\n");
        out.push_str("            .unwrap_or(\"\")\n");
        out.push_str("    }\n");
        out.push_str("}\n\n");

        out.push_str("fn send(builder: RequestBuilder) -> Captured {\n");
        out.push_str("    let resp = builder.send().expect(\"request failed\");\n");
        out.push_str("    let status = resp.status().as_u16();\n");
        out.push_str("    let headers = resp.headers().clone();\n");
        out.push_str("    let body = resp.text().expect(\"response body is not text\");\n");
        out.push_str("    Captured { status, headers, body }\n");
        out.push_str("}\n\n");
    }

    fn setup(&mut self, out: &mut String, suite: &SuiteHeader) {
        out.push_str("fn suite() -> &'static Suite {\n");
        out.push_str("    static SUITE: OnceLock<Suite> = OnceLock::new();\n");
        out.push_str("    SUITE.get_or_init(|| {\n");
        out.push_str("        let client = Client::builder()\n");
        out.push_str(&format!(
            "            .connect_timeout(Duration::from_secs({}))\n",
            CONNECT_TIMEOUT_SECS
        ));
        out.push_str("            .build()\n");
        out.push_str("            .expect(\"failed to build HTTP client\");\n");
        // insert() replaces, so a repeated config header keeps its last value.
        if suite.default_headers.is_empty() {
            out.push_str("        let default_headers = HeaderMap::new();\n");
        } else {
            out.push_str("        let mut default_headers = HeaderMap::new();\n");
            // Checked at run time so a bad pair names itself in the panic.
            for (key, value) in &suite.default_headers {
                out.push_str("        default_headers.insert(\n");
                out.push_str(&format!(
                    "            HeaderName::try_from(\"{}\").expect(\"invalid default header name '{}'\"),\n",
                    key, key
                ));
                out.push_str(&format!(
                    "            HeaderValue::from_str(\"{}\").expect(\"invalid value for default header '{}'\"),\n",
                    value, key
                ));
                out.push_str("        );\n");
            }
        }
        out.push_str("        Suite { client, default_headers }\n");
        out.push_str("    })\n");
        out.push_str("}\n\n");
    }

    fn begin_test(&mut self, out: &mut String, fn_name: &str) {
        out.push_str("#[test]\n");
        out.push_str(&format!("fn {}() {{\n", fn_name));
        out.push_str(&format!("{}let suite = suite();\n", INDENT));
    }

    fn request(&mut self, out: &mut String, request: &RenderedRequest) {
        out.push_str(&format!("{}let mut b = suite\n", INDENT));
        out.push_str(&format!("{}    .client\n", INDENT));
        out.push_str(&format!(
            "{}    .{}({})\n",
            INDENT,
            client_method(request.method),
            url_expr(&request.url)
        ));
        out.push_str(&format!(
            "{}    .timeout(Duration::from_secs({}))",
            INDENT, REQUEST_TIMEOUT_SECS
        ));
        match &request.body {
            BodyExpr::None => {}
            BodyExpr::Empty => out.push_str(&format!("\n{}    .body(\"\")", INDENT)),
            BodyExpr::Text(body) => {
                out.push_str(&format!("\n{}    .body(\"{}\")", INDENT, body))
            }
        }
        out.push_str(";\n");

        for (key, value) in &request.headers {
            out.push_str(&format!("{}b = b.header(\"{}\", \"{}\");\n", INDENT, key, value));
        }
        // headers() replaces same-named request headers: defaults win.
        out.push_str(&format!(
            "{}b = b.headers(suite.default_headers.clone());\n",
            INDENT
        ));
        // Shadowing keeps only the latest response visible to assertions.
        out.push_str(&format!("{}let resp = send(b);\n\n", INDENT));
    }

    fn assertion(&mut self, out: &mut String, assertion: &RenderedAssertion) {
        let line = match assertion {
            RenderedAssertion::StatusEquals(code) => {
                format!("assert_eq!({}, resp.status);", code)
            }
            RenderedAssertion::HeaderEquals { key, value } => {
                format!("assert_eq!(\"{}\", resp.header(\"{}\"));", value, key)
            }
            RenderedAssertion::HeaderContains { key, value } => {
                format!("assert!(resp.header(\"{}\").contains(\"{}\"));", key, value)
            }
            RenderedAssertion::BodyContains(value) => {
                format!("assert!(resp.body.contains(\"{}\"));", value)
            }
        };
        out.push_str(INDENT);
        out.push_str(&line);
        out.push('\n');
    }

    fn end_test(&mut self, out: &mut String) {
        out.push_str("}\n\n");
    }

    fn finish(&mut self, out: &mut String) {
        // Drop the trailing blank line after the last test.
        if out.ends_with("\n\n") {
            out.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_request_shapes() {
        let mut writer = RustWriter::new();
        let mut out = String::new();
        writer.begin_test(&mut out, "test_Create");
        writer.request(
            &mut out,
            &RenderedRequest {
                method: HttpMethod::Post,
                url: UrlExpr::Relative("/users".to_string()),
                body: BodyExpr::Text("{\\\"a\\\":1}".to_string()),
                headers: vec![("X-Trace".to_string(), "1".to_string())],
            },
        );
        writer.end_test(&mut out);

        assert!(out.contains("#[test]\nfn test_Create() {"));
        assert!(out.contains(".post(format!(\"{}{}\", BASE, \"/users\"))"));
        assert!(out.contains(".timeout(Duration::from_secs(10))"));
        assert!(out.contains(".body(\"{\\\"a\\\":1}\");"));
        assert!(out.contains("b = b.header(\"X-Trace\", \"1\");"));
        assert!(out.find("X-Trace") < out.find("b = b.headers(suite.default_headers.clone());"));
        assert!(out.contains("let resp = send(b);"));
    }

    #[test]
    fn test_rust_get_has_no_body() {
        let mut writer = RustWriter::new();
        let mut out = String::new();
        writer.request(
            &mut out,
            &RenderedRequest {
                method: HttpMethod::Get,
                url: UrlExpr::Absolute("http://h/x".to_string()),
                body: BodyExpr::None,
                headers: vec![],
            },
        );
        assert!(out.contains(".get(\"http://h/x\")"));
        assert!(!out.contains(".body("));
    }

    #[test]
    fn test_rust_assertions() {
        let mut writer = RustWriter::new();
        let mut out = String::new();
        writer.assertion(&mut out, &RenderedAssertion::StatusEquals(200));
        writer.assertion(
            &mut out,
            &RenderedAssertion::HeaderEquals {
                key: "Content-Type".to_string(),
                value: "text/plain".to_string(),
            },
        );
        writer.assertion(&mut out, &RenderedAssertion::BodyContains("hi".to_string()));

        assert!(out.contains("assert_eq!(200, resp.status);"));
        assert!(out.contains("assert_eq!(\"text/plain\", resp.header(\"Content-Type\"));"));
        assert!(out.contains("assert!(resp.body.contains(\"hi\"));"));
    }

    #[test]
    fn test_rust_setup_lists_defaults_in_order() {
        let mut writer = RustWriter::new();
        let suite = SuiteHeader {
            base_url: "https://api.example.com".to_string(),
            default_headers: vec![
                ("Accept".to_string(), "json".to_string()),
                ("Accept".to_string(), "xml".to_string()),
            ],
        };
        let mut out = String::new();
        writer.preamble(&mut out, &suite);
        writer.setup(&mut out, &suite);

        assert!(out.contains("const BASE: &str = \"https://api.example.com\";"));
        assert!(out.contains(".connect_timeout(Duration::from_secs(5))"));
        let json = out.find("HeaderValue::from_str(\"json\").expect(\"invalid value for default header 'Accept'\"),");
        let xml = out.find("HeaderValue::from_str(\"xml\").expect(\"invalid value for default header 'Accept'\"),");
        assert!(json.is_some() && json < xml);
        assert!(out.contains("HeaderName::try_from(\"Accept\").expect(\"invalid default header name 'Accept'\"),"));
        assert!(!out.contains("from_static"));
    }
}
