mod handler;
mod io;
mod protocol;

use std::io::{BufRead, Write};

use sqlite_pager::{AppError, AppResult};

use crate::cli::Args;

use handler::BridgeHandler;
use io::NdjsonIo;
use protocol::BridgeRequest;

pub fn run(args: Args) -> AppResult<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut io = NdjsonIo::stdio();
    let mut handler = BridgeHandler::new(args.options());
    rt.block_on(serve(&mut io, &mut handler))
}

async fn serve<R: BufRead, W: Write>(
    io: &mut NdjsonIo<R, W>,
    handler: &mut BridgeHandler,
) -> AppResult<()> {
    loop {
        let Some(line) = io.read_line()? else { break };
        if line.is_empty() {
            continue;
        }

        let req: BridgeRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                // Unknown id; still answer so the client is not left waiting.
                io.protocol_error(e.to_string())?;
                continue;
            }
        };

        let resp = handler.handle(req).await;
        io.write_json_line(&resp)?;
    }

    Ok(())
}
