//! The public Tilia API.
//!
//! Every operation follows the same steps: make sure a valid token is
//! cached, send one request, decode the envelope into the operation's
//! entity. A `Failed` envelope is returned as `Ok` with `failed()` set;
//! `Err` is reserved for transport, decode and token failures.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::TiliaConfig;
use crate::dispatcher::Dispatcher;
use crate::entities::{
    decode, ApiResponse, EntityDecoder, Escrow, Invoice, KycStatus, NewInvoice, NewPayout,
    NewUser, PaymentMethods, Payout, PayoutList, RedirectRequest, Registration, User, UserAuth,
};
use crate::protocol::{escape, fields, request_url, Envelope, Service};
use crate::token::TokenManager;
use crate::transport::{HttpMethod, HttpTransport, ReqwestTransport};
use crate::Result;

const V1: Option<&str> = Some("v1");
const V2: Option<&str> = Some("v2");

/// Client for the Tilia payments and identity services.
///
/// Cheap to share behind an `Arc`; all operations take `&self`.
pub struct TiliaClient {
    dispatcher: Dispatcher,
    tokens: TokenManager,
    scope: String,
}

impl TiliaClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(config: TiliaConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout_secs)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    pub fn with_transport(config: TiliaConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        config.validate()?;
        let scope = config.scope();
        Ok(Self {
            dispatcher: Dispatcher::new(transport, Arc::new(config)),
            tokens: TokenManager::new(),
            scope,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &TiliaConfig {
        self.dispatcher.config()
    }

    /// Forget the cached token; the next call exchanges credentials again.
    pub async fn invalidate_token(&self) {
        self.tokens.invalidate().await;
    }

    // ========================================================================
    // Payouts
    // ========================================================================

    /// Start a payout from one of the account's payment methods.
    #[instrument(skip(self, payout), fields(amount = payout.amount))]
    pub async fn create_payout(
        &self,
        account_id: &str,
        payout: &NewPayout,
    ) -> Result<ApiResponse<Payout>> {
        let resource = format!("{}/payout", escape(account_id));
        self.call(HttpMethod::Post, Service::Invoicing, V2, &resource, Some(json_body(payout)?))
            .await
    }

    /// Fetch one payout.
    #[instrument(skip(self))]
    pub async fn get_payout(
        &self,
        account_id: &str,
        payout_id: &str,
    ) -> Result<ApiResponse<Payout>> {
        let resource = format!("{}/payout/{}", escape(account_id), escape(payout_id));
        self.call(HttpMethod::Get, Service::Invoicing, V2, &resource, None).await
    }

    /// List the account's payouts.
    #[instrument(skip(self))]
    pub async fn get_payouts(&self, account_id: &str) -> Result<ApiResponse<PayoutList>> {
        let resource = format!("{}/payouts", escape(account_id));
        self.call(HttpMethod::Get, Service::Invoicing, V2, &resource, None).await
    }

    /// Cancel a payout that has not been processed yet.
    #[instrument(skip(self))]
    pub async fn cancel_payout(
        &self,
        account_id: &str,
        payout_id: &str,
    ) -> Result<ApiResponse<Payout>> {
        let resource = format!("{}/payout/{}", escape(account_id), escape(payout_id));
        self.call(HttpMethod::Delete, Service::Invoicing, V2, &resource, None).await
    }

    // ========================================================================
    // Escrows
    // ========================================================================

    /// Create an escrow holding the invoice's funds until commit or cancel.
    #[instrument(skip(self, invoice), fields(account_id = %invoice.account_id))]
    pub async fn create_escrow(&self, invoice: &NewInvoice) -> Result<ApiResponse<Escrow>> {
        self.call(HttpMethod::Post, Service::Invoicing, V2, "escrow", Some(json_body(invoice)?))
            .await
    }

    /// Pay a previously created escrow.
    #[instrument(skip(self))]
    pub async fn pay_escrow(&self, escrow_id: &str) -> Result<ApiResponse<Escrow>> {
        self.escrow_action(escrow_id, "pay").await
    }

    /// Release escrowed funds to the recipients.
    #[instrument(skip(self))]
    pub async fn commit_escrow(&self, escrow_id: &str) -> Result<ApiResponse<Escrow>> {
        self.escrow_action(escrow_id, "commit").await
    }

    /// Return escrowed funds to the payer.
    #[instrument(skip(self))]
    pub async fn cancel_escrow(&self, escrow_id: &str) -> Result<ApiResponse<Escrow>> {
        self.escrow_action(escrow_id, "cancel").await
    }

    /// Fetch one escrow.
    #[instrument(skip(self))]
    pub async fn get_escrow(&self, escrow_id: &str) -> Result<ApiResponse<Escrow>> {
        let resource = format!("escrow/{}", escape(escrow_id));
        self.call(HttpMethod::Get, Service::Invoicing, V2, &resource, None).await
    }

    async fn escrow_action(&self, escrow_id: &str, action: &str) -> Result<ApiResponse<Escrow>> {
        let resource = format!("escrow/{}/{}", escape(escrow_id), action);
        self.call(HttpMethod::Post, Service::Invoicing, V2, &resource, Some(String::new())).await
    }

    // ========================================================================
    // Invoices
    // ========================================================================

    /// Create an invoice.
    #[instrument(skip(self, invoice), fields(account_id = %invoice.account_id))]
    pub async fn create_invoice(&self, invoice: &NewInvoice) -> Result<ApiResponse<Invoice>> {
        self.call(HttpMethod::Post, Service::Invoicing, V2, "invoice", Some(json_body(invoice)?))
            .await
    }

    /// Pay a previously created invoice.
    #[instrument(skip(self))]
    pub async fn pay_invoice(&self, invoice_id: &str) -> Result<ApiResponse<Invoice>> {
        let resource = format!("invoice/{}/pay", escape(invoice_id));
        self.call(HttpMethod::Post, Service::Invoicing, V2, &resource, Some(String::new())).await
    }

    /// Fetch one invoice.
    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: &str) -> Result<ApiResponse<Invoice>> {
        let resource = format!("invoice/{}", escape(invoice_id));
        self.call(HttpMethod::Get, Service::Invoicing, V2, &resource, None).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Issue a one-time login redirect for a user, limited to `scopes`.
    #[instrument(skip(self))]
    pub async fn request_client_redirect_url(
        &self,
        account_id: &str,
        scopes: &[String],
    ) -> Result<ApiResponse<UserAuth>> {
        let body = json_body(&RedirectRequest { account_id, scopes })?;
        self.call(HttpMethod::Post, Service::Auth, None, "authorize/user", Some(body)).await
    }

    /// Register a new user.
    ///
    /// Registration is two requests: the first returns a registration id,
    /// the second completes it. Only the final result is returned.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn register_user(&self, user: &NewUser) -> Result<ApiResponse<Registration>> {
        let envelope = self
            .send(HttpMethod::Post, Service::Registration, V2, "register", Some(json_body(user)?))
            .await?;

        let registration_id = envelope
            .payload
            .as_ref()
            .and_then(|payload| fields::string(payload, "registration_id"));

        match registration_id {
            Some(registration_id) if envelope.succeeded() => {
                debug!(%registration_id, "completing registration");
                let resource = format!("register/{}", escape(&registration_id));
                self.call(
                    HttpMethod::Put,
                    Service::Registration,
                    V2,
                    &resource,
                    Some(registration_id),
                )
                .await
            }
            _ => Ok(decode(&envelope)),
        }
    }

    /// Identity verification state of an account.
    #[instrument(skip(self))]
    pub async fn check_kyc(&self, account_id: &str) -> Result<ApiResponse<KycStatus>> {
        let resource = format!("kyc/{}", escape(account_id));
        self.call(HttpMethod::Get, Service::Pii, V1, &resource, None).await
    }

    /// Payment methods stored on an account.
    #[instrument(skip(self))]
    pub async fn get_payment_methods(
        &self,
        account_id: &str,
    ) -> Result<ApiResponse<PaymentMethods>> {
        let resource = format!("{}/payment_methods", escape(account_id));
        self.call(HttpMethod::Get, Service::Payments, None, &resource, None).await
    }

    /// Account details of a user.
    #[instrument(skip(self))]
    pub async fn get_user_info(&self, account_id: &str) -> Result<ApiResponse<User>> {
        let resource = format!("{}/user-info", escape(account_id));
        self.call(HttpMethod::Get, Service::Accounts, V1, &resource, None).await
    }

    /// Look a user up by username.
    #[instrument(skip(self))]
    pub async fn search_for_user(&self, username: &str) -> Result<ApiResponse<User>> {
        let resource = format!("user-info/search?username={}", escape(username));
        self.call(HttpMethod::Get, Service::Accounts, V1, &resource, None).await
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    async fn call<T: EntityDecoder>(
        &self,
        method: HttpMethod,
        service: Service,
        version: Option<&str>,
        resource: &str,
        body: Option<String>,
    ) -> Result<ApiResponse<T>> {
        let envelope = self.send(method, service, version, resource, body).await?;
        Ok(decode(&envelope))
    }

    async fn send(
        &self,
        method: HttpMethod,
        service: Service,
        version: Option<&str>,
        resource: &str,
        body: Option<String>,
    ) -> Result<Envelope> {
        let token = self
            .tokens
            .ensure_valid_token(&self.dispatcher, &self.scope)
            .await?;
        let url = request_url(self.config().api_host(), service, version, resource);
        self.dispatcher.send(method, &url, body, Some(&token)).await
    }
}

fn json_body<B: Serialize>(body: &B) -> Result<String> {
    Ok(serde_json::to_string(body)?)
}
