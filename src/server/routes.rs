//! Route table for the local API server.

use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(method: &str, path: &str, body: &str) -> HttpResponse {
    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/simulate") => match api::simulate_payload(body) {
            Ok(payload) => json_ok(payload),
            Err(api::SimulateError::Busy) => {
                error_response(409, "Conflict", "a simulation is already running")
            }
            Err(err @ api::SimulateError::Parse(_)) => {
                error_response(400, "Bad Request", &err.to_string())
            }
            Err(err @ api::SimulateError::Validation(_)) => {
                error_response(400, "Bad Request", &err.to_string())
            }
        },
        ("POST", "/api/validate") => match api::validate_payload(body) {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(400, "Bad Request", &err.to_string()),
        },
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn json_ok(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>rotasim console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    textarea { width: 100%; min-height: 220px; font-family: monospace; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 160px; }
  </style>
</head>
<body>
  <h1>rotasim local API</h1>
  <p>Paste a build JSON, validate it, then run the simulation.</p>

  <div class="card">
    <strong>Build</strong>
    <textarea id="build">{"stats":{"min_damage":100,"max_damage":150,"critical":0.15,"haste":0.15,"mana_regen":10},"mana":300,"simulators":10,"targets":1,"simulation_time_ms":60000,"abilities":[{"id":20,"rank":5},{"id":21,"rank":5},{"id":22,"rank":3}],"queue":[22,21,20]}</textarea>
    <div>
      <button id="validate-btn">POST /api/validate</button>
      <button id="simulate-btn">POST /api/simulate</button>
    </div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    async function post(path) {
      output.textContent = 'Loading…';
      const response = await fetch(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: document.getElementById('build').value,
      });
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    }
    document.getElementById('validate-btn').addEventListener('click', () => post('/api/validate'));
    document.getElementById('simulate-btn').addEventListener('click', () => post('/api/simulate'));
  </script>
</body>
</html>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_route_is_404() {
        let response = route_request("GET", "/nope", "");
        assert_eq!(response.status_code, 404);
    }

    #[test]
    fn health_route_returns_json() {
        let response = route_request("GET", "/api/health", "");
        assert_eq!(response.status_code, 200);
        assert_eq!(response.content_type, "application/json");
    }

    #[test]
    fn simulate_route_rejects_bad_body() {
        let response = route_request("POST", "/api/simulate", "{");
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn http_string_carries_content_length() {
        let response = route_request("GET", "/api/health", "");
        let raw = response.to_http_string();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains(&format!("Content-Length: {}", response.body.len())));
    }
}
