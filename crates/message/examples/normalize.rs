//! Parses each argument as a URI and prints its components and canonical form.
//!
//! ```shell
//! cargo run -p micro-message --example normalize -- 'HTTP://Example.COM:80/a b?x=%zz'
//! ```

use micro_message::protocol::{Message, Request};
use micro_message::uri::Uri;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    for input in std::env::args().skip(1) {
        let uri = match Uri::parse(&input) {
            Ok(uri) => uri,
            Err(e) => {
                error!(input, cause = %e, "invalid uri");
                continue;
            }
        };

        info!(
            scheme = uri.scheme(),
            user_info = uri.user_info(),
            host = uri.host(),
            port = ?uri.port(),
            path = uri.path(),
            query = uri.query(),
            fragment = uri.fragment(),
            "parsed uri"
        );

        let request = Request::new(http::Method::GET, uri);
        info!(
            uri = %request.uri(),
            request_target = %request.request_target(),
            host = %request.header_line("host"),
            "normalized"
        );
    }
}
