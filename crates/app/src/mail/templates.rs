//! Email templates.

use std::fmt::Write;

use jiff::Zoned;

use crate::mail::mailer::Email;

/// What the purchase confirmation needs to know.
#[derive(Debug, Clone)]
pub struct PurchaseConfirmation<'a> {
    pub customer_name: &'a str,
    pub customer_email: &'a str,
    pub track_title: &'a str,
    pub artist: Option<&'a str>,
    pub cover_image_url: Option<&'a str>,
    pub amount: &'a str,
    pub currency: &'a str,
    pub transaction_id: &'a str,
    pub download_url: &'a str,
}

const STYLE: &str = "body { font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif; \
line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; \
background-color: #f8f9fa; } \
.container { background-color: white; border-radius: 8px; padding: 30px; } \
.header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #007bff; padding-bottom: 20px; } \
.beat-info { display: flex; align-items: center; margin: 20px 0; padding: 20px; background-color: #f8f9fa; border-radius: 8px; } \
.beat-cover { width: 100px; height: 100px; border-radius: 8px; margin-right: 20px; object-fit: cover; } \
.download-section { text-align: center; margin: 30px 0; padding: 20px; background-color: #e8f4fd; border-radius: 8px; } \
.download-button { display: inline-block; background-color: #007bff; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; font-weight: bold; margin-top: 15px; } \
.footer { text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; color: #666; font-size: 14px; }";

/// Confirmation sent once an order is recorded.
#[must_use]
pub fn purchase_confirmation(from: &str, details: &PurchaseConfirmation<'_>) -> Email {
    Email {
        from: from.to_string(),
        to: vec![details.customer_email.to_string()],
        subject: format!(
            "🎵 Your Beat \"{}\" is Ready for Download!",
            details.track_title
        ),
        html: render_purchase_confirmation(details),
    }
}

fn render_purchase_confirmation(details: &PurchaseConfirmation<'_>) -> String {
    let title = escape(details.track_title);

    let mut beat = String::new();

    if let Some(cover) = details.cover_image_url {
        let _ = write!(
            beat,
            r#"<img src="{}" alt="{title}" class="beat-cover">"#,
            escape(cover)
        );
    }

    let _ = write!(beat, r#"<div class="beat-details"><h3>{title}</h3>"#);

    if let Some(artist) = details.artist {
        let _ = write!(beat, "<p><strong>Artist:</strong> {}</p>", escape(artist));
    }

    let _ = write!(
        beat,
        "<p><strong>Amount Paid:</strong> {} {}</p>\
         <p><strong>Transaction ID:</strong> {}</p></div>",
        escape(details.currency),
        escape(details.amount),
        escape(details.transaction_id),
    );

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Beat Purchase Confirmation</title>
    <style>{STYLE}</style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>🎵 Thank You for Your Purchase!</h1>
        <p>Your beat is ready for download</p>
      </div>
      <p>Hi {name},</p>
      <p>Thank you for purchasing from our beat store! Your payment has been successfully processed and your beat is now available for download.</p>
      <div class="beat-info">{beat}</div>
      <div class="download-section">
        <h3>🎧 Your Beat is Ready!</h3>
        <p>Click the button below to download your high-quality beat file:</p>
        <a href="{download}" class="download-button">Download Beat</a>
        <p style="margin-top: 15px; font-size: 12px; color: #666;">This download link is secure and unique to your purchase.</p>
      </div>
      <div style="background-color: #fff3cd; padding: 15px; border-radius: 5px; margin: 20px 0;">
        <p><strong>Important:</strong> Please save this email and download your beat as soon as possible. If you have any issues with your download, please contact our support team.</p>
      </div>
      <div class="footer">
        <p>Thank you for choosing our beat store!</p>
        <p>&copy; {year} Beat Store. All rights reserved.</p>
      </div>
    </div>
  </body>
</html>
"#,
        name = escape(details.customer_name),
        download = escape(details.download_url),
        year = Zoned::now().year(),
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}
