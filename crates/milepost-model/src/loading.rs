// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Instance loader for the TSP domain.
//!
//! This module turns whitespace-delimited text streams into a validated
//! `Graph`. The expected format is a single token `N` (the number of
//! cities) followed by `N*N` distance entries in row-major order. Lines
//! may contain comments introduced by `#`, which are ignored during
//! tokenization.
//!
//! The loader emphasizes clarity and robustness: tokens are parsed into
//! the requested numeric type with descriptive errors naming the
//! offending token, and structural validation (dimensions, sign, zero
//! diagonal) is delegated to `GraphBuilder` so file loading and
//! programmatic construction reject exactly the same instances.
//!
//! The parser accepts any `BufRead`, file path, raw reader, or string
//! slice, making it convenient to integrate with benchmarks, tests, and
//! tooling.

use crate::{
    graph::{Graph, GraphBuildError, GraphBuilder},
    index::CityIndex,
};
use num_traits::{PrimInt, Signed};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the graph loading process.
#[derive(Debug)]
pub enum GraphLoadError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended unexpectedly (e.g., missing tokens).
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The instance failed structural validation.
    Build(GraphBuildError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl std::fmt::Display for GraphLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Build(e) => write!(f, "Invalid instance: {}", e),
        }
    }
}

impl std::error::Error for GraphLoadError {}

impl From<std::io::Error> for GraphLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for GraphLoadError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<GraphBuildError> for GraphLoadError {
    fn from(e: GraphBuildError) -> Self {
        Self::Build(e)
    }
}

/// A loader for TSP graph instances.
///
/// The format this parser expects is as follows (whitespace-separated
/// tokens, `#` starts a comment through end-of-line):
///
/// ```raw
/// N                    # number of cities
/// d_0_0 ... d_0_|N|    # row 0 of the distance matrix
/// ...
/// d_|N|_0 ... d_|N|_|N|
/// ```
///
/// # Examples
///
/// ```rust
/// use milepost_model::loading::GraphLoader;
///
/// let input = "2\n0 5\n5 0\n";
/// let graph = GraphLoader::default().load_from_str::<i64>(input).unwrap();
/// assert_eq!(graph.size(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphLoader;

impl GraphLoader {
    /// Loads a graph from a file path.
    pub fn load_from_path<T, P>(&self, path: P) -> Result<Graph<T>, GraphLoadError>
    where
        T: PrimInt + Signed + FromStr,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Loads a graph from a string slice.
    pub fn load_from_str<T>(&self, input: &str) -> Result<Graph<T>, GraphLoadError>
    where
        T: PrimInt + Signed + FromStr,
    {
        self.load_from_reader(input.as_bytes())
    }

    /// Loads a graph from any buffered reader.
    pub fn load_from_reader<T, R>(&self, reader: R) -> Result<Graph<T>, GraphLoadError>
    where
        T: PrimInt + Signed + FromStr,
        R: Read,
    {
        let mut tokens = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let content = match line.split_once('#') {
                Some((before_comment, _)) => before_comment,
                None => line.as_str(),
            };
            tokens.extend(content.split_whitespace().map(str::to_owned));
        }

        let mut stream = tokens.iter();
        let size: usize = parse_token(stream.next())?;

        let mut builder = GraphBuilder::<T>::new(size);
        for from in 0..size {
            for to in 0..size {
                let weight: T = parse_token(stream.next())?;
                builder.set_distance(CityIndex::new(from), CityIndex::new(to), weight);
            }
        }

        Ok(builder.build()?)
    }
}

fn parse_token<V>(token: Option<&String>) -> Result<V, GraphLoadError>
where
    V: FromStr,
{
    let token = token.ok_or(GraphLoadError::UnexpectedEof)?;
    token.parse::<V>().map_err(|_| {
        GraphLoadError::Parse(ParseTokenError {
            token: token.clone(),
            type_name: std::any::type_name::<V>(),
        })
    })
}
