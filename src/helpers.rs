use std::io::{self, BufRead, Write};

/// Line-oriented prompting over any reader/writer pair.
/// The binary uses stdin/stdout, tests feed a byte slice.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and reads one line without its line ending.
    /// End of input is an `UnexpectedEof` error.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the race was set up",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Asks again until the answer is a number in `1..=max`
    pub fn ask_number(&mut self, prompt: &str, max: u32) -> io::Result<u32> {
        loop {
            match self.ask(prompt)?.trim().parse::<u32>() {
                Ok(value) if (1..=max).contains(&value) => return Ok(value),
                _ => continue,
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
