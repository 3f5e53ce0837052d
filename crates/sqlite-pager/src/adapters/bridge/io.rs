use std::io::{BufRead, BufReader, BufWriter, Write};

use sqlite_pager::{AppError, AppResult};

pub struct NdjsonIo<R, W> {
    input: R,
    output: W,
}

impl NdjsonIo<BufReader<std::io::Stdin>, BufWriter<std::io::Stdout>> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), BufWriter::new(std::io::stdout()))
    }
}

impl<R: BufRead, W: Write> NdjsonIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` at end of input; blank lines come back as empty strings.
    pub fn read_line(&mut self) -> AppResult<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn write_json_line<T: serde::Serialize>(&mut self, v: &T) -> AppResult<()> {
        serde_json::to_writer(&mut self.output, v)?;
        self.output.write_all(b"\n")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn protocol_error(&mut self, msg: String) -> AppResult<()> {
        #[derive(serde::Serialize)]
        struct ErrResp {
            v: u32,
            id: &'static str,
            status: &'static str,
            error: String,
            code: &'static str,
        }
        let r = ErrResp {
            v: 1,
            id: "",
            status: "error",
            error: msg,
            code: AppError::InvalidRequest(String::new()).code(),
        };
        self.write_json_line(&r)
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
