use crate::entities::{PaymentProvider, Plan};
use crate::error::{AppError, AppResult};
use crate::external::{PaypalClient, RazorpayClient};
use crate::models::{
    CapturePaypalRequest, PaymentResult, PlanPricing, ReportCheckoutRequest,
    ReportCheckoutResponse, VerifyRazorpayRequest,
};
use crate::services::pricing::{plan_pricing, report_price};
use crate::services::wallet_service::{Credit, WalletOwner, WalletService};
use serde_json::Value;

const PAYPAL_COMPLETED: &str = "COMPLETED";

#[derive(Clone)]
pub struct PaymentService {
    wallet_service: WalletService,
    razorpay: RazorpayClient,
    paypal: PaypalClient,
}

impl PaymentService {
    pub fn new(wallet_service: WalletService, razorpay: RazorpayClient, paypal: PaypalClient) -> Self {
        Self {
            wallet_service,
            razorpay,
            paypal,
        }
    }

    /// 创建 Razorpay 订单，金额已是最小货币单位
    pub async fn create_razorpay_order(
        &self,
        amount: i64,
        currency: Option<&str>,
    ) -> AppResult<Value> {
        validate_amount(amount)?;
        self.razorpay
            .create_order(amount, currency.unwrap_or("INR"))
            .await
    }

    /// 校验签名，通过后为付款账号的钱包入账
    pub async fn verify_razorpay(
        &self,
        owner: WalletOwner,
        request: VerifyRazorpayRequest,
    ) -> AppResult<PaymentResult> {
        if !self.razorpay.verify_signature(
            &request.order_id,
            &request.payment_id,
            &request.signature,
        ) {
            log::warn!(
                "Razorpay signature mismatch: {:?} order {} payment {}",
                owner,
                request.order_id,
                request.payment_id
            );
            return Ok(PaymentResult::failed(Some("Invalid signature")));
        }

        let wallet = self
            .wallet_service
            .get_or_create(owner)
            .await?;
        self.wallet_service
            .add_funds(
                wallet.id,
                Credit {
                    amount: request.amount,
                    currency: "INR",
                    provider: PaymentProvider::Razorpay,
                    payment_id: Some(&request.payment_id),
                    order_id: Some(&request.order_id),
                },
            )
            .await?;
        Ok(PaymentResult::ok())
    }

    pub async fn create_paypal_order(&self, amount: i64, currency: Option<&str>) -> AppResult<Value> {
        validate_amount(amount)?;
        self.paypal
            .create_order(amount, currency.unwrap_or("USD"))
            .await
    }

    /// 捕获 PayPal 订单，只有 COMPLETED 才入账
    pub async fn capture_paypal(
        &self,
        owner: WalletOwner,
        request: CapturePaypalRequest,
    ) -> AppResult<PaymentResult> {
        let capture = self.paypal.capture_order(&request.order_id).await?;
        if capture.status != PAYPAL_COMPLETED {
            log::warn!(
                "PayPal order {} not completed (status {})",
                request.order_id,
                capture.status
            );
            return Ok(PaymentResult::failed(None));
        }

        let wallet = self
            .wallet_service
            .get_or_create(owner)
            .await?;
        self.wallet_service
            .add_funds(
                wallet.id,
                Credit {
                    amount: request.amount,
                    currency: "USD",
                    provider: PaymentProvider::Paypal,
                    payment_id: Some(&capture.capture_id),
                    order_id: Some(&request.order_id),
                },
            )
            .await?;
        Ok(PaymentResult::ok())
    }

    pub fn pricing(&self, plan: Option<&str>, is_international: bool) -> PlanPricing {
        let plan = plan.map(Plan::parse).unwrap_or(Plan::Basic);
        plan_pricing(plan, is_international)
    }

    /// 付费报告下单：国际走 PayPal（前端创建订单），国内直接创建 Razorpay 订单
    pub async fn checkout_report(
        &self,
        request: ReportCheckoutRequest,
    ) -> AppResult<ReportCheckoutResponse> {
        let (amount, currency) = report_price(request.report_type, request.is_international);
        if request.is_international {
            return Ok(ReportCheckoutResponse {
                method: PaymentProvider::Paypal.to_string(),
                order: None,
                amount,
                currency: currency.to_string(),
            });
        }

        let order = self.razorpay.create_order(amount, currency).await?;
        Ok(ReportCheckoutResponse {
            method: PaymentProvider::Razorpay.to_string(),
            order: Some(order),
            amount,
            currency: currency.to_string(),
        })
    }
}

fn validate_amount(amount: i64) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::ValidationError(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
