use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION};
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use common::catalogue::{METS_DSPACE_SIP, SERVICE_DOCUMENT_PATH, ZIP_MEDIA_TYPE};

use super::error::ApiError;
use crate::http_server::sword::headers::{NO_OP, ON_BEHALF_OF, PACKAGING, SLUG, VERBOSE};

/// Who a request is made as.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub username: Option<String>,
    pub password: Option<String>,
    pub on_behalf_of: Option<String>,
}

/// A package to post to a collection.
#[derive(Debug, Clone)]
pub struct DepositUpload {
    pub collection: Url,
    pub package: Vec<u8>,
    pub filename: Option<String>,
    pub slug: Option<String>,
    pub no_op: bool,
    pub verbose: bool,
}

/// What the server answered to an accepted deposit.
#[derive(Debug, Clone)]
pub struct DepositReceipt {
    pub location: Option<String>,
    pub entry: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/atom+xml, application/atomsvc+xml, application/xml"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    fn as_user(&self, builder: RequestBuilder, user: &UserContext) -> RequestBuilder {
        let builder = match &user.username {
            Some(username) => builder.basic_auth(username, user.password.as_ref()),
            None => builder,
        };
        match &user.on_behalf_of {
            Some(obo) => builder.header(ON_BEHALF_OF.as_str(), obo),
            None => builder,
        }
    }

    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Fetch the service document as XML.
    pub async fn service_document(&self, user: &UserContext) -> Result<String, ApiError> {
        let url = self.remote.join(SERVICE_DOCUMENT_PATH)?;
        let request = self.as_user(self.client.get(url), user);
        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.text().await?)
    }

    /// Post a zip package to a collection.
    pub async fn deposit(
        &self,
        user: &UserContext,
        upload: DepositUpload,
    ) -> Result<DepositReceipt, ApiError> {
        let mut request = self
            .client
            .post(upload.collection.clone())
            .header(CONTENT_TYPE, ZIP_MEDIA_TYPE)
            .header(PACKAGING.as_str(), METS_DSPACE_SIP)
            .header(NO_OP.as_str(), upload.no_op.to_string())
            .header(VERBOSE.as_str(), upload.verbose.to_string());
        if let Some(filename) = &upload.filename {
            request = request.header(CONTENT_DISPOSITION, format!("filename={}", filename));
        }
        if let Some(slug) = &upload.slug {
            request = request.header(SLUG.as_str(), slug);
        }

        let request = self.as_user(request, user).body(upload.package);
        let response = Self::ensure_success(request.send().await?).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(DepositReceipt {
            location,
            entry: response.text().await?,
        })
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
