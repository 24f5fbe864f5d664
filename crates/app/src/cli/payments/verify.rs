use beatstore::{metadata::OrderMetadata, money::from_minor_units};
use beatstore_app::{
    payments::{HttpPaymentGateway, PaymentGateway},
    secrets::ApiSecret,
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct VerifyPaymentArgs {
    /// Payment reference
    #[arg(long)]
    reference: String,

    /// Gateway secret key
    #[arg(long, env = "PAYMENT_GATEWAY_SECRET_KEY", hide_env_values = true)]
    secret_key: String,

    /// Gateway API base URL
    #[arg(long, env = "PAYMENT_GATEWAY_BASE_URL", default_value = "https://api.paystack.co")]
    base_url: String,
}

pub(crate) async fn run(args: VerifyPaymentArgs) -> Result<(), String> {
    let gateway = HttpPaymentGateway::new(args.base_url, ApiSecret::new(args.secret_key));

    let response = gateway
        .verify(&args.reference)
        .await
        .map_err(|error| format!("failed to verify payment: {error}"))?;

    if !response.status {
        return Err(format!("gateway rejected verification: {}", response.message));
    }

    let Some(transaction) = response.data else {
        return Err("gateway returned no transaction".to_string());
    };

    println!("reference: {}", transaction.reference);
    println!("status: {}", transaction.status);
    println!(
        "amount: {} {}",
        transaction.currency.as_deref().unwrap_or("?"),
        from_minor_units(transaction.amount)
    );
    println!(
        "paid_at: {}",
        transaction.paid_at.as_deref().unwrap_or("not paid")
    );

    match OrderMetadata::decode(&transaction.metadata) {
        Ok(metadata) => println!(
            "track_id: {}",
            metadata
                .primary_track_id()
                .map_or("none", |track_id| track_id.as_str())
        ),
        Err(error) => println!("metadata: {error}"),
    }

    Ok(())
}
