use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Link a user follows to pick a new password
pub fn reset_link(app_host: &str, callback_id: &str) -> String {
    format!("{app_host}/auth/reset-password/{callback_id}")
}

pub async fn send_password_reset(
    ses: &SesClient,
    from: &str,
    to: &str,
    link: &str,
) -> Result<(), BoxError> {
    let subject = Content::builder().data("Reset your password").build()?;

    let body_text = format!(
        "We received a request to reset your password. \
         If you made this request, open the link below to choose a new one:\n\n\
         {link}\n\n\
         If you did not request this, ignore this email."
    );
    let body_html = format!(
        "<p>We received a request to reset your password. If you made this request, \
         <a href=\"{link}\" target=\"_blank\">click here to reset your password.</a></p>\
         <p>If you did not request this, ignore this email.</p>"
    );

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .html(Content::builder().data(body_html).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    tracing::info!(to = to, "Password reset link sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link() {
        assert_eq!(
            reset_link("https://packstack.io", "0a1b2c3d4e5f6789"),
            "https://packstack.io/auth/reset-password/0a1b2c3d4e5f6789"
        );
    }
}
