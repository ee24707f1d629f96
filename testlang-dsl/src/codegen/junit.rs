//! JUnit 5 backend on top of `java.net.http`.

use super::*;

const INDENT: &str = "        ";
const CONTINUATION: &str = "            ";

/// Writes a single JUnit 5 test class.
pub struct JunitWriter {
    class_name: String,
    requests_in_test: usize,
}

impl JunitWriter {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            requests_in_test: 0,
        }
    }
}

fn url_expr(url: &UrlExpr) -> String {
    match url {
        UrlExpr::Relative(path) => format!("BASE + \"{}\"", path),
        UrlExpr::Absolute(url) => format!("\"{}\"", url),
    }
}

fn method_call(request: &RenderedRequest) -> String {
    let verb = request.method.as_str();
    match &request.body {
        BodyExpr::None => format!(".{}()", verb),
        BodyExpr::Empty => format!(".{}(HttpRequest.BodyPublishers.noBody())", verb),
        BodyExpr::Text(body) => {
            format!(".{}(HttpRequest.BodyPublishers.ofString(\"{}\"))", verb, body)
        }
    }
}

impl TargetWriter for JunitWriter {
    fn preamble(&mut self, out: &mut String, suite: &SuiteHeader) {
        out.push_str("import org.junit.jupiter.api.*;\n");
        out.push_str("import static org.junit.jupiter.api.Assertions.*;\n");
        out.push_str("import java.net.http.*;\n");
        out.push_str("import java.net.*;\n");
        out.push_str("import java.time.Duration;\n");
        out.push_str("import java.nio.charset.StandardCharsets;\n");
        out.push_str("import java.util.*;\n\n");

        out.push_str(&format!("public class {} {{\n\n", self.class_name));
        out.push_str(&format!("    static String BASE = \"{}\";\n", suite.base_url));
        out.push_str("    static Map<String,String> DEFAULT_HEADERS = new HashMap<>();\n");
        out.push_str("    static HttpClient client;\n\n");
    }

    fn setup(&mut self, out: &mut String, suite: &SuiteHeader) {
        out.push_str("    @BeforeAll\n");
        out.push_str("    static void setup() {\n");
        out.push_str(&format!(
            "{}client = HttpClient.newBuilder().connectTimeout(Duration.ofSeconds({})).build();\n",
            INDENT, CONNECT_TIMEOUT_SECS
        ));
        for (key, value) in &suite.default_headers {
            out.push_str(&format!(
                "{}DEFAULT_HEADERS.put(\"{}\",\"{}\");\n",
                INDENT, key, value
            ));
        }
        out.push_str("    }\n\n");
    }

    fn begin_test(&mut self, out: &mut String, fn_name: &str) {
        self.requests_in_test = 0;
        out.push_str("    @Test\n");
        out.push_str(&format!("    void {}() throws Exception {{\n", fn_name));
    }

    fn request(&mut self, out: &mut String, request: &RenderedRequest) {
        // Later requests in the same method reuse the locals.
        let (builder_decl, response_decl) = if self.requests_in_test == 0 {
            ("HttpRequest.Builder b", "HttpResponse<String> resp")
        } else {
            ("b", "resp")
        };
        self.requests_in_test += 1;

        out.push_str(&format!(
            "{}{} = HttpRequest.newBuilder(URI.create({}))\n",
            INDENT,
            builder_decl,
            url_expr(&request.url)
        ));
        out.push_str(&format!(
            "{}.timeout(Duration.ofSeconds({}))\n",
            CONTINUATION, REQUEST_TIMEOUT_SECS
        ));
        out.push_str(&format!("{}{};\n", CONTINUATION, method_call(request)));

        for (key, value) in &request.headers {
            out.push_str(&format!("{}b.header(\"{}\", \"{}\");\n", INDENT, key, value));
        }
        out.push_str(&format!(
            "{}for (var e: DEFAULT_HEADERS.entrySet()) b.header(e.getKey(), e.getValue());\n",
            INDENT
        ));
        out.push_str(&format!(
            "{}{} = client.send(b.build(), HttpResponse.BodyHandlers.ofString(StandardCharsets.UTF_8));\n\n",
            INDENT, response_decl
        ));
    }

    fn assertion(&mut self, out: &mut String, assertion: &RenderedAssertion) {
        let line = match assertion {
            RenderedAssertion::StatusEquals(code) => {
                format!("assertEquals({}, resp.statusCode());", code)
            }
            RenderedAssertion::HeaderEquals { key, value } => format!(
                "assertEquals(\"{}\", resp.headers().firstValue(\"{}\").orElse(\"\"));",
                value, key
            ),
            RenderedAssertion::HeaderContains { key, value } => format!(
                "assertTrue(resp.headers().firstValue(\"{}\").orElse(\"\").contains(\"{}\"));",
                key, value
            ),
            RenderedAssertion::BodyContains(value) => {
                format!("assertTrue(resp.body().contains(\"{}\"));", value)
            }
        };
        out.push_str(INDENT);
        out.push_str(&line);
        out.push('\n');
    }

    fn end_test(&mut self, out: &mut String) {
        out.push_str("    }\n\n");
    }

    fn finish(&mut self, out: &mut String) {
        out.push_str("}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: HttpMethod, url: UrlExpr, body: BodyExpr) -> RenderedRequest {
        RenderedRequest {
            method,
            url,
            body,
            headers: vec![],
        }
    }

    #[test]
    fn test_junit_request_shapes() {
        let mut writer = JunitWriter::new("GeneratedTests");
        let mut out = String::new();
        writer.begin_test(&mut out, "test_A");
        writer.request(
            &mut out,
            &request(
                HttpMethod::Get,
                UrlExpr::Relative("/api/users/42".to_string()),
                BodyExpr::None,
            ),
        );
        writer.request(
            &mut out,
            &request(
                HttpMethod::Post,
                UrlExpr::Absolute("http://other/x".to_string()),
                BodyExpr::Empty,
            ),
        );

        assert!(out.contains(
            "HttpRequest.Builder b = HttpRequest.newBuilder(URI.create(BASE + \"/api/users/42\"))"
        ));
        assert!(out.contains(".GET();"));
        assert!(out.contains("        b = HttpRequest.newBuilder(URI.create(\"http://other/x\"))"));
        assert!(out.contains(".POST(HttpRequest.BodyPublishers.noBody());"));
        assert_eq!(out.matches("HttpResponse<String> resp =").count(), 1);
        assert_eq!(out.matches("        resp = client.send(").count(), 1);
    }

    #[test]
    fn test_junit_counter_resets_per_test() {
        let mut writer = JunitWriter::new("GeneratedTests");
        let mut out = String::new();
        let get = request(HttpMethod::Get, UrlExpr::Relative("/".to_string()), BodyExpr::None);
        for name in ["test_A", "test_B"] {
            writer.begin_test(&mut out, name);
            writer.request(&mut out, &get);
            writer.end_test(&mut out);
        }
        assert_eq!(out.matches("HttpRequest.Builder b =").count(), 2);
    }

    #[test]
    fn test_junit_assertions() {
        let mut writer = JunitWriter::new("GeneratedTests");
        let mut out = String::new();
        writer.assertion(&mut out, &RenderedAssertion::StatusEquals(201));
        writer.assertion(
            &mut out,
            &RenderedAssertion::HeaderEquals {
                key: "Content-Type".to_string(),
                value: "application/json".to_string(),
            },
        );
        writer.assertion(
            &mut out,
            &RenderedAssertion::HeaderContains {
                key: "Content-Type".to_string(),
                value: "json".to_string(),
            },
        );
        writer.assertion(&mut out, &RenderedAssertion::BodyContains("ok".to_string()));

        assert!(out.contains("assertEquals(201, resp.statusCode());"));
        assert!(out.contains(
            "assertEquals(\"application/json\", resp.headers().firstValue(\"Content-Type\").orElse(\"\"));"
        ));
        assert!(out.contains(
            "assertTrue(resp.headers().firstValue(\"Content-Type\").orElse(\"\").contains(\"json\"));"
        ));
        assert!(out.contains("assertTrue(resp.body().contains(\"ok\"));"));
    }

    #[test]
    fn test_junit_setup_keeps_header_order() {
        let mut writer = JunitWriter::new("ApiSuite");
        let suite = SuiteHeader {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: vec![
                ("B".to_string(), "2".to_string()),
                ("A".to_string(), "1".to_string()),
            ],
        };
        let mut out = String::new();
        writer.preamble(&mut out, &suite);
        writer.setup(&mut out, &suite);

        assert!(out.contains("public class ApiSuite {"));
        assert!(out.contains("static String BASE = \"http://localhost:8080\";"));
        assert!(out.contains("connectTimeout(Duration.ofSeconds(5))"));
        let b = out.find("DEFAULT_HEADERS.put(\"B\",\"2\");");
        let a = out.find("DEFAULT_HEADERS.put(\"A\",\"1\");");
        assert!(b.is_some() && a.is_some() && b < a);
    }
}
