//! In-process products backend for integration tests.
//!
//! Serves the same routes as the real API from an in-memory catalogue and
//! records every request it receives.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use matchit::Router;
use tokio::net::TcpListener;

use shelf::{PaginatedProducts, Product};

/// A request as seen by the backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
struct Backend {
    products: Mutex<Vec<Product>>,
    requests: Mutex<Vec<Recorded>>,
    fail_deletes: Mutex<bool>,
    raw_list_body: Mutex<Option<String>>,
}

#[derive(Clone, Copy)]
enum Route {
    Products,
    Register,
    Product,
}

fn build_router() -> Router<Route> {
    let mut router = Router::new();
    router.insert("/api/Products", Route::Products).unwrap();
    router.insert("/api/Products/register-with-image", Route::Register).unwrap();
    router.insert("/api/Products/{id}", Route::Product).unwrap();
    router
}

pub struct TestServer {
    pub base_url: String,
    backend: Arc<Backend>,
}

impl TestServer {
    pub async fn start(products: Vec<Product>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let backend = Arc::new(Backend {
            products: Mutex::new(products),
            ..Default::default()
        });
        let router = Arc::new(build_router());

        let server_backend = Arc::clone(&backend);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let io = TokioIo::new(stream);
                let backend = Arc::clone(&server_backend);
                let router = Arc::clone(&router);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        handle_request(req, Arc::clone(&backend), Arc::clone(&router))
                    });
                    let _ = http1::Builder::new().serve_connection(io, service).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/api", addr),
            backend,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, method: Method) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    pub fn fail_deletes(&self) {
        *self.backend.fail_deletes.lock().unwrap() = true;
    }

    /// Answer list requests with `body` verbatim.
    pub fn serve_raw_list(&self, body: &str) {
        *self.backend.raw_list_body.lock().unwrap() = Some(body.to_string());
    }
}

pub fn product(id: i64) -> Product {
    Product {
        id,
        external_id: 1000 + id,
        title: format!("Product {}", id),
        barcode: format!("{:013}", id),
        price: 2.0 * id as f64,
        description: format!("Description {}", id),
        category: Some("general".into()),
        image: format!("http://localhost:5086/images/{}.png", id),
    }
}

pub fn catalogue(count: i64) -> Vec<Product> {
    (1..=count).map(product).collect()
}

fn json(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

async fn handle_request(
    req: Request<Incoming>,
    backend: Arc<Backend>,
    router: Arc<Router<Route>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = body
        .collect()
        .await
        .map(|c| c.to_bytes())
        .unwrap_or_default();

    backend.requests.lock().unwrap().push(Recorded {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        content_type: parts
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let Ok(matched) = router.at(parts.uri.path()) else {
        return Ok(json(StatusCode::NOT_FOUND, r#"{"error":"Not found"}"#.into()));
    };
    let route = *matched.value;
    let id: Option<i64> = matched.params.get("id").and_then(|v| v.parse().ok());

    let response = match (parts.method, route) {
        (Method::GET, Route::Products) => list(&backend, parts.uri.query()),
        (Method::POST, Route::Register) => json(StatusCode::CREATED, "{}".into()),
        (Method::PUT, Route::Product) => {
            let exists = backend.products.lock().unwrap().iter().any(|p| Some(p.id) == id);
            if exists {
                empty(StatusCode::OK)
            } else {
                json(StatusCode::NOT_FOUND, r#"{"error":"Product not found"}"#.into())
            }
        }
        (Method::DELETE, Route::Product) => {
            if *backend.fail_deletes.lock().unwrap() {
                return Ok(json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"error":"Delete failed"}"#.into(),
                ));
            }
            let mut products = backend.products.lock().unwrap();
            let before = products.len();
            products.retain(|p| Some(p.id) != id);
            if products.len() < before {
                empty(StatusCode::NO_CONTENT)
            } else {
                json(StatusCode::NOT_FOUND, r#"{"error":"Product not found"}"#.into())
            }
        }
        _ => json(
            StatusCode::METHOD_NOT_ALLOWED,
            r#"{"error":"Method not allowed"}"#.into(),
        ),
    };

    Ok(response)
}

fn list(backend: &Backend, query: Option<&str>) -> Response<Full<Bytes>> {
    if let Some(raw) = backend.raw_list_body.lock().unwrap().clone() {
        return json(StatusCode::OK, raw);
    }

    let params = parse_query(query);
    let page_number: u32 = params.get("pageNumber").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: u32 = params.get("pageSize").and_then(|p| p.parse().ok()).unwrap_or(4);

    let products = backend.products.lock().unwrap();
    let matching: Vec<Product> = products
        .iter()
        .filter(|p| {
            params
                .get("name")
                .map_or(true, |name| p.title.to_lowercase().contains(&name.to_lowercase()))
        })
        .filter(|p| params.get("barcode").map_or(true, |b| &p.barcode == b))
        .cloned()
        .collect();

    let total_records = matching.len() as u32;
    let start = ((page_number.max(1) - 1) * page_size) as usize;
    let data = matching
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    let page = PaginatedProducts {
        page_number,
        page_size,
        total_records,
        data,
    };
    json(StatusCode::OK, serde_json::to_string(&page).unwrap())
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(q) = query {
        for part in q.split('&') {
            if let Some((key, value)) = part.split_once('=') {
                map.insert(urldecode(key), urldecode(value));
            }
        }
    }
    map
}

fn urldecode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut input = s.bytes();
    while let Some(b) = input.next() {
        match b {
            b'%' => {
                let hex: Vec<u8> = input.by_ref().take(2).collect();
                let decoded = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = decoded {
                    bytes.push(byte);
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urldecode_handles_multibyte_utf8() {
        assert_eq!(urldecode("Caf%C3%A9+au+lait"), "Café au lait");
        assert_eq!(urldecode("plain"), "plain");
    }
}
