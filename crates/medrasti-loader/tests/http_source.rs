//! Loader against a local HTTP responder

use std::sync::{Arc, Mutex};

use medrasti_core::{InvoiceError, InvoiceSource, Locale};
use medrasti_loader::{InvoiceClient, LoadError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve one canned response per connection, recording request lines
async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let text = String::from_utf8_lossy(&request);
            if let Some(line) = text.lines().next() {
                log.lock().unwrap().push(line.to_string());
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base, seen)
}

const INVOICE: &str = r#"{
  "ref": "INV-001",
  "paymentMethod": "CASH",
  "monthInvoiceRelations": [{
    "totalAmount": "1000.00",
    "paidAmount": 1000,
    "remainingAmount": 0,
    "status": "PAID",
    "enrollementPayment": {"month": {"frenchName": "Janvier", "arabicName": "يناير"}}
  }],
  "enrollement": {
    "enrollementPrice": 0,
    "student": {"firstName": "Amine", "lastName": "Ba", "matricule": "M1"},
    "schoolClass": {"name": "CE1"},
    "year": "2024-2025"
  }
}"#;

#[tokio::test]
async fn test_fetch_decodes_record() {
    let (base, seen) = serve("200 OK", INVOICE).await;
    let client = InvoiceClient::with_url(base).unwrap();

    let record = client.fetch("17").await.unwrap().expect("record");
    assert_eq!(record.reference, "INV-001");
    assert_eq!(record.totals().expect("totals").paid, 1000.into());
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        ["GET /invoice/complete/17 HTTP/1.1"]
    );
}

#[tokio::test]
async fn test_null_body_is_no_data() {
    let (base, _) = serve("200 OK", "null").await;
    let client = InvoiceClient::with_url(base).unwrap();
    assert_eq!(client.fetch("1").await.unwrap(), None);
}

#[tokio::test]
async fn test_error_status_carries_server_message() {
    let (base, _) = serve(
        "404 Not Found",
        r#"{"statusCode":404,"message":"Facture introuvable"}"#,
    )
    .await;
    let client = InvoiceClient::with_url(base).unwrap();

    let direct = client.fetch_invoice("99").await.unwrap_err();
    assert!(matches!(direct, LoadError::ServerError { status: 404, .. }));

    let err: InvoiceError = client.fetch("99").await.unwrap_err().into();
    assert_eq!(err.user_message(Locale::Fr), "Facture introuvable");
}

#[tokio::test]
async fn test_error_without_message_uses_generic_text() {
    let (base, _) = serve("500 Internal Server Error", "oops").await;
    let client = InvoiceClient::with_url(base).unwrap();
    let err: InvoiceError = client.fetch("1").await.unwrap_err().into();
    assert_eq!(
        err.user_message(Locale::Fr),
        Locale::Fr.config().messages.fetch_failed
    );
}

#[tokio::test]
async fn test_malformed_body_is_a_fetch_failure() {
    let (base, _) = serve("200 OK", "{not json").await;
    let client = InvoiceClient::with_url(base).unwrap();
    assert!(matches!(
        client.fetch_invoice("1").await,
        Err(LoadError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_fetch_asset_bytes() {
    let (base, seen) = serve("200 OK", "PNGDATA").await;
    let client = InvoiceClient::with_url(base.clone()).unwrap();
    let bytes = client.fetch_asset("/uploads/logo.png").await.unwrap();
    assert_eq!(bytes, b"PNGDATA");
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        ["GET /uploads/logo.png HTTP/1.1"]
    );
}

#[tokio::test]
async fn test_unreachable_server_is_a_fetch_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = InvoiceClient::with_url(base).unwrap();
    let err: InvoiceError = client.fetch("1").await.unwrap_err().into();
    assert!(matches!(err, InvoiceError::FetchFailed { message: None, .. }));
}
