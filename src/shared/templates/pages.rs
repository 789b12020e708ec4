use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::{context, Value};

use crate::core::error::AppError;
use crate::features::tools::models::Category;
use crate::shared::flash::{FlashMessage, FlashSigner, IncomingFlash};
use crate::shared::templates::PageRenderer;

/// Shared plumbing for HTML handlers: rendering, error pages, flash redirects
#[derive(Clone)]
pub struct Pages {
    renderer: Arc<PageRenderer>,
    flash: Arc<FlashSigner>,
    payment_enabled: bool,
}

impl Pages {
    pub fn new(renderer: Arc<PageRenderer>, flash: Arc<FlashSigner>, payment_enabled: bool) -> Self {
        Self {
            renderer,
            flash,
            payment_enabled,
        }
    }

    pub fn flash_signer(&self) -> &FlashSigner {
        &self.flash
    }

    /// Page context plus the values every template can rely on
    fn page_context(&self, flashes: &[FlashMessage], ctx: Value) -> Value {
        let categories: Vec<Value> = Category::ALL
            .iter()
            .map(|c| context! { key => c.key(), label => c.label() })
            .collect();

        context! {
            flashes => flashes,
            payment_enabled => self.payment_enabled,
            categories => categories,
            ..ctx
        }
    }

    pub fn render(&self, template: &str, ctx: Value, flash: IncomingFlash) -> Response {
        self.render_with_status(StatusCode::OK, template, ctx, flash)
    }

    /// Render a page and consume any pending flash messages
    pub fn render_with_status(
        &self,
        status: StatusCode,
        template: &str,
        ctx: Value,
        flash: IncomingFlash,
    ) -> Response {
        let ctx = self.page_context(flash.messages(), ctx);

        match self.renderer.render(template, ctx) {
            Ok(html) => flash.finish((status, Html(html)).into_response()),
            Err(e) => self.error(e.into()),
        }
    }

    /// Render `error.html` with the status that matches the error
    pub fn error(&self, err: AppError) -> Response {
        let status = err.status_code();
        let message = err.public_message();
        let title = match status {
            StatusCode::NOT_FOUND => "Page not found",
            StatusCode::BAD_REQUEST => "Invalid request",
            StatusCode::CONFLICT => "Already exists",
            _ => "Something went wrong",
        };

        let ctx = self.page_context(
            &[],
            context! {
                status => status.as_u16(),
                title => title,
                message => &message,
            },
        );

        match self.renderer.render("error.html", ctx) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, message).into_response()
            }
        }
    }

    /// 303 redirect, optionally carrying a flash message
    pub fn redirect(&self, to: &str, flash: Option<FlashMessage>) -> Response {
        let redirect = Redirect::to(to);
        let Some(message) = flash else {
            return redirect.into_response();
        };

        match self.flash.set_cookie(&[message]) {
            Ok(cookie) => ([(header::SET_COOKIE, cookie)], redirect).into_response(),
            Err(e) => {
                tracing::warn!("Dropping flash message: {}", e);
                redirect.into_response()
            }
        }
    }
}
