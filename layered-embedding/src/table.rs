//! In-memory word vector table.
//!
//! Reads the plain word2vec text format (`word v1 v2 ... vN` per line) and
//! keeps every vector in memory. Nearest-neighbour search is a linear scan,
//! which is enough for document-sized bridging work.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EmbeddingError, EmbeddingResult};
use crate::store::{cosine_distance, EmbeddingStore};

/// A word → vector table with a fixed dimension.
///
/// # Example
/// ```
/// use layered_embedding::{EmbeddingStore, VectorTable};
///
/// let mut table = VectorTable::new(2);
/// table.insert("house", vec![1.0, 0.0]).unwrap();
/// table.insert("door", vec![0.9, 0.1]).unwrap();
///
/// let nearest = table.nearest(&[1.0, 0.0], 1);
/// assert_eq!(nearest[0].0, "house");
/// assert!(table.lookup("window").is_err());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorTable {
    dimension: usize,
    words: Vec<String>,
    vectors: Vec<Vec<f32>>,
    #[serde(skip)]
    word_index: HashMap<String, usize>,
}

impl VectorTable {
    /// Create an empty table for vectors of `dimension` values.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Insert or replace the vector for `word`.
    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) -> EmbeddingResult<()> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                found: vector.len(),
            });
        }

        let word = word.into();
        match self.word_index.get(&word) {
            Some(&index) => self.vectors[index] = vector,
            None => {
                self.word_index.insert(word.clone(), self.words.len());
                self.words.push(word);
                self.vectors.push(vector);
            }
        }
        Ok(())
    }

    /// Read a table in word2vec text format.
    ///
    /// The first line with at least two values fixes the dimension. Lines
    /// before it with fewer values (the `count dim` header) are skipped, as
    /// are later lines of the wrong width. A value that is not a number is
    /// a parse error.
    pub fn from_reader<R: BufRead>(reader: R) -> EmbeddingResult<Self> {
        let mut table: Option<VectorTable> = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let mut fields = line.split_whitespace();
            let word = match fields.next() {
                Some(word) => word,
                None => continue,
            };
            let values: Vec<&str> = fields.collect();

            let expected = table.as_ref().map(|t| t.dimension);
            match expected {
                None if values.len() < 2 => {
                    log::debug!("skipping header line {}", line_no);
                    continue;
                }
                Some(dimension) if values.len() != dimension => {
                    log::warn!(
                        "skipping line {}: expected {} values, found {}",
                        line_no,
                        dimension,
                        values.len()
                    );
                    continue;
                }
                _ => {}
            }

            let vector = values
                .iter()
                .map(|v| {
                    v.parse::<f32>().map_err(|e| EmbeddingError::Parse {
                        line: line_no,
                        message: format!("'{}': {}", v, e),
                    })
                })
                .collect::<EmbeddingResult<Vec<f32>>>()?;

            table
                .get_or_insert_with(|| VectorTable::new(vector.len()))
                .insert(word, vector)?;
        }

        table.ok_or(EmbeddingError::Parse {
            line: 0,
            message: "no vectors found".to_string(),
        })
    }

    /// Read a word2vec text file from disk.
    pub fn from_text_file(path: &Path) -> EmbeddingResult<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the table holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns true if `word` has a vector.
    pub fn contains(&self, word: &str) -> bool {
        self.word_index.contains_key(word)
    }

    /// The `k` words closest to `vector`, by ascending cosine distance.
    ///
    /// Words whose distance is undefined are left out. Equal distances keep
    /// insertion order.
    pub fn nearest(&self, vector: &[f32], k: usize) -> Vec<(&str, f64)> {
        let mut scored: Vec<(&str, f64)> = self
            .words
            .iter()
            .zip(self.vectors.iter())
            .filter_map(|(word, candidate)| {
                cosine_distance(vector, candidate).map(|d| (word.as_str(), d))
            })
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        scored
    }

    /// Write the table to `path` as RON.
    pub fn save(&self, path: &Path) -> EmbeddingResult<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new()).map_err(
            |e| EmbeddingError::Serialize {
                message: e.to_string(),
            },
        )?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Read a table written by [`save`](VectorTable::save).
    pub fn load(path: &Path) -> EmbeddingResult<Self> {
        let text = fs::read_to_string(path)?;
        let mut table: VectorTable =
            ron::from_str(&text).map_err(|e| EmbeddingError::Serialize {
                message: e.to_string(),
            })?;

        if table.words.len() != table.vectors.len() {
            return Err(EmbeddingError::Serialize {
                message: format!(
                    "{} words but {} vectors",
                    table.words.len(),
                    table.vectors.len()
                ),
            });
        }
        if let Some(bad) = table.vectors.iter().find(|v| v.len() != table.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: table.dimension,
                found: bad.len(),
            });
        }

        table.word_index = table
            .words
            .iter()
            .enumerate()
            .map(|(index, word)| (word.clone(), index))
            .collect();
        Ok(table)
    }
}

impl EmbeddingStore for VectorTable {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn lookup(&self, token: &str) -> EmbeddingResult<Cow<'_, [f32]>> {
        self.word_index
            .get(token)
            .map(|&index| Cow::Borrowed(self.vectors[index].as_slice()))
            .ok_or_else(|| EmbeddingError::Missing {
                token: token.to_string(),
            })
    }
}
