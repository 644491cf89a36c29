use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{message}"))]
    Configuration { message: String },
    #[snafu(display("Port {port} is already in use"))]
    PortInUse { port: u16 },
    #[snafu(display("Web server stopped: {message}"))]
    Server { message: String },
}
