//! Generic CRUD operations over the typed resource collections.
//!
//! Every collection endpoint speaks the same protocol: paginated list with
//! filter/sort parameters, retrieve/create/update/delete by id, one
//! bulk-delete action, and a CSV/PDF export action. [`ApiResource`] captures
//! the per-resource facts (path, display columns, payload type) and the
//! generic methods on [`MonetaClient`] do the rest, so adding a collection
//! means implementing one trait rather than copying a client module.

use crate::{
    client::MonetaClient,
    error::Result,
    models::{
        Account, AccountDraft, Customer, CustomerDraft, Export, ExportFormat, Invoice,
        InvoiceDraft, Order, OrderDraft, Permission, Product, ProductDraft, Receipt, ReceiptDraft,
        ReportSummary, Role, RoleDraft, Transaction, TransactionDraft,
    },
    pagination::{ListQuery, Page},
};
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A resource served by one of the collection endpoints.
///
/// Implementations supply the collection path and the create/update payload
/// type; [`MonetaClient`] provides list/get/create/update/delete/bulk-delete/
/// export generically over any implementor.
pub trait ApiResource: DeserializeOwned + Serialize {
    /// Collection path under the API origin, e.g. `/api/products`.
    const COLLECTION: &'static str;

    /// Singular label for messages and filenames, e.g. `product`.
    const LABEL: &'static str;

    /// Field names in table-display order.
    const COLUMNS: &'static [&'static str];

    /// Payload for create and update requests.
    type Draft: Serialize + Send + Sync;

    /// Primary key of this record.
    fn id(&self) -> u64;
}

impl ApiResource for Product {
    const COLLECTION: &'static str = "/api/products";
    const LABEL: &'static str = "product";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "sku", "unit_price", "quantity_on_hand", "category", "active"];
    type Draft = ProductDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Customer {
    const COLLECTION: &'static str = "/api/customers";
    const LABEL: &'static str = "customer";
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "phone", "balance"];
    type Draft = CustomerDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Transaction {
    const COLLECTION: &'static str = "/api/transactions";
    const LABEL: &'static str = "transaction";
    const COLUMNS: &'static [&'static str] =
        &["id", "occurred_on", "description", "amount", "kind", "category"];
    type Draft = TransactionDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Invoice {
    const COLLECTION: &'static str = "/api/invoices";
    const LABEL: &'static str = "invoice";
    const COLUMNS: &'static [&'static str] =
        &["id", "number", "customer_name", "status", "issued_on", "due_on", "total", "amount_paid"];
    type Draft = InvoiceDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Receipt {
    const COLLECTION: &'static str = "/api/receipts";
    const LABEL: &'static str = "receipt";
    const COLUMNS: &'static [&'static str] =
        &["id", "number", "invoice_id", "amount", "method", "received_on"];
    type Draft = ReceiptDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Order {
    const COLLECTION: &'static str = "/api/orders";
    const LABEL: &'static str = "order";
    const COLUMNS: &'static [&'static str] =
        &["id", "number", "customer_name", "status", "placed_on", "total"];
    type Draft = OrderDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Account {
    const COLLECTION: &'static str = "/api/users";
    const LABEL: &'static str = "user";
    const COLUMNS: &'static [&'static str] =
        &["id", "username", "email", "role", "active", "last_login_at"];
    type Draft = AccountDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ApiResource for Role {
    const COLLECTION: &'static str = "/api/roles";
    const LABEL: &'static str = "role";
    const COLUMNS: &'static [&'static str] = &["id", "name", "description"];
    type Draft = RoleDraft;

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Serialize)]
struct BulkDeleteRequest<'a> {
    ids: &'a [u64],
}

#[derive(Debug, Deserialize)]
struct BulkDeleteResponse {
    deleted: u64,
}

impl MonetaClient {
    /// List one page of a collection.
    pub async fn list<R: ApiResource>(&self, query: &ListQuery) -> Result<Page<R>> {
        let url = self.url(R::COLLECTION);
        debug!(
            "[RESOURCE] GET {} page={} page_size={}",
            url, query.page, query.page_size
        );

        let request = self
            .auth
            .apply_to_request(self.http_client.get(&url).query(&query.to_query_pairs()))?;
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Retrieve a single record by id.
    pub async fn get<R: ApiResource>(&self, id: u64) -> Result<R> {
        let url = format!("{}/{}", self.url(R::COLLECTION), id);
        debug!("[RESOURCE] GET {}", url);

        let request = self.auth.apply_to_request(self.http_client.get(&url))?;
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Create a record from a draft payload.
    pub async fn create<R: ApiResource>(&self, draft: &R::Draft) -> Result<R> {
        let url = self.url(R::COLLECTION);
        debug!("[RESOURCE] POST {} ({})", url, R::LABEL);

        let request = self
            .auth
            .apply_to_request(self.http_client.post(&url).json(draft))?;
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Update an existing record.
    pub async fn update<R: ApiResource>(&self, id: u64, draft: &R::Draft) -> Result<R> {
        let url = format!("{}/{}", self.url(R::COLLECTION), id);
        debug!("[RESOURCE] PUT {}", url);

        let request = self
            .auth
            .apply_to_request(self.http_client.put(&url).json(draft))?;
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Delete a single record.
    pub async fn delete<R: ApiResource>(&self, id: u64) -> Result<()> {
        let url = format!("{}/{}", self.url(R::COLLECTION), id);
        debug!("[RESOURCE] DELETE {}", url);

        let request = self.auth.apply_to_request(self.http_client.delete(&url))?;
        let response = request.send().await?;
        Self::check(response).await
    }

    /// Delete several records in one request.
    ///
    /// Issues a single `POST <collection>/bulk-delete` and returns the count
    /// the server reports. Servers that answer with an empty body are taken
    /// at their word and the requested count is returned.
    pub async fn delete_many<R: ApiResource>(&self, ids: &[u64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let url = format!("{}/bulk-delete", self.url(R::COLLECTION));
        debug!("[RESOURCE] POST {} ids={}", url, ids.len());

        let body = BulkDeleteRequest { ids };
        let request = self
            .auth
            .apply_to_request(self.http_client.post(&url).json(&body))?;
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<BulkDeleteResponse>(&text) {
            Ok(parsed) => Ok(parsed.deleted),
            Err(_) => Ok(ids.len() as u64),
        }
    }

    /// Export a collection as CSV or PDF, honoring the query's filters.
    ///
    /// The server renders the document; the client returns the raw bytes
    /// plus a filename taken from `Content-Disposition` when present.
    pub async fn export<R: ApiResource>(
        &self,
        format: ExportFormat,
        query: &ListQuery,
    ) -> Result<Export> {
        let url = format!("{}/export", self.url(R::COLLECTION));
        debug!("[RESOURCE] GET {} format={}", url, format);

        let mut pairs = query.to_query_pairs();
        pairs.retain(|(k, _)| k != "page" && k != "page_size");
        pairs.push(("format".to_string(), format.as_str().to_string()));

        let request = self
            .auth
            .apply_to_request(self.http_client.get(&url).query(&pairs))?;
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let fallback = format!("{}s.{}", R::LABEL, format.extension());
        Self::read_export(response, fallback).await
    }

    /// List every permission known to the server.
    ///
    /// Permissions are a fixed catalog, so the endpoint is list-only and
    /// unpaginated.
    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        let url = self.url("/api/permissions");
        debug!("[RESOURCE] GET {}", url);

        let request = self.auth.apply_to_request(self.http_client.get(&url))?;
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Fetch the financial summary for a reporting period.
    ///
    /// Dates are `YYYY-MM-DD`, inclusive on both ends.
    pub async fn report_summary(&self, from: &str, to: &str) -> Result<ReportSummary> {
        let url = self.url("/api/reports/summary");
        debug!("[RESOURCE] GET {} from={} to={}", url, from, to);

        let request = self.auth.apply_to_request(
            self.http_client
                .get(&url)
                .query(&[("from", from), ("to", to)]),
        )?;
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Export the report for a period as CSV or PDF.
    pub async fn report_export(
        &self,
        format: ExportFormat,
        from: &str,
        to: &str,
    ) -> Result<Export> {
        let url = self.url("/api/reports/export");
        debug!("[RESOURCE] GET {} format={} from={} to={}", url, format, from, to);

        let request = self.auth.apply_to_request(self.http_client.get(&url).query(&[
            ("format", format.as_str()),
            ("from", from),
            ("to", to),
        ]))?;
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let fallback = format!("report_{}_{}.{}", from, to, format.extension());
        Self::read_export(response, fallback).await
    }

    async fn read_export(response: reqwest::Response, fallback_name: String) -> Result<Export> {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_disposition_filename)
            .unwrap_or(fallback_name);
        let bytes = response.bytes().await?.to_vec();

        Ok(Export {
            bytes,
            content_type,
            filename,
        })
    }
}

/// Pull the filename out of a `Content-Disposition` header value like
/// `attachment; filename="products.csv"`.
fn parse_disposition_filename(value: &str) -> Option<String> {
    let marker = "filename=";
    let start = value.find(marker)? + marker.len();
    let rest = value[start..].trim();
    let name = rest
        .trim_start_matches('"')
        .split(['"', ';'])
        .next()?
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        assert_eq!(Product::COLLECTION, "/api/products");
        assert_eq!(Account::COLLECTION, "/api/users");
        assert_eq!(Role::COLLECTION, "/api/roles");
    }

    #[test]
    fn test_columns_start_with_id() {
        assert_eq!(Product::COLUMNS[0], "id");
        assert_eq!(Invoice::COLUMNS[0], "id");
        assert_eq!(Customer::COLUMNS[0], "id");
    }

    #[test]
    fn test_disposition_filename_quoted() {
        let name = parse_disposition_filename("attachment; filename=\"products.csv\"");
        assert_eq!(name.as_deref(), Some("products.csv"));
    }

    #[test]
    fn test_disposition_filename_bare() {
        let name = parse_disposition_filename("attachment; filename=report.pdf");
        assert_eq!(name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_disposition_filename_missing() {
        assert_eq!(parse_disposition_filename("inline"), None);
        assert_eq!(parse_disposition_filename("attachment; filename="), None);
    }

    #[test]
    fn test_bulk_delete_request_shape() {
        let body = BulkDeleteRequest { ids: &[1, 2, 3] };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ids"], serde_json::json!([1, 2, 3]));
    }
}
