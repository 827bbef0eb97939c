// src/parser/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use super::tables::{Entry, RuleInfo, Table};

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct TableDisk {
    num_terminals: usize,
    num_tokens: usize,
    rules: Vec<RuleInfo>,
    /// `null` rows accept; cells are `s<state>`, `r<rule>` or `.`.
    #[serde_as(as = "Vec<Option<Vec<DisplayFromStr>>>")]
    rows: Vec<Option<Vec<Entry>>>,
}

impl From<&Table> for TableDisk {
    fn from(t: &Table) -> Self {
        Self {
            num_terminals: t.num_terminals,
            num_tokens: t.num_tokens,
            rules: t.rules.clone(),
            rows: t.rows.clone(),
        }
    }
}

impl TableDisk {
    fn into_table(self) -> Result<Table, String> {
        if self.num_terminals > self.num_tokens {
            return Err(format!(
                "num_terminals={} exceeds num_tokens={}",
                self.num_terminals, self.num_tokens
            ));
        }
        let num_states = self.rows.len();
        for (i, row) in self.rows.iter().enumerate() {
            let Some(row) = row else { continue };
            if row.len() != self.num_tokens {
                return Err(format!(
                    "row {i} has {} cells, expected {}",
                    row.len(),
                    self.num_tokens
                ));
            }
            for (t, e) in row.iter().enumerate() {
                let ok = match *e {
                    Entry::Transition(s) => s < num_states,
                    Entry::Reduce(r) => r < self.rules.len(),
                    Entry::Error => true,
                };
                if !ok {
                    return Err(format!("row {i}, token {t}: {e} is out of range"));
                }
            }
        }
        Ok(Table {
            rows: self.rows,
            num_terminals: self.num_terminals,
            num_tokens: self.num_tokens,
            rules: self.rules,
        })
    }
}

pub fn save_table_json(path: &Path, t: &Table) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, &TableDisk::from(t))?;
    w.flush()
}

pub fn load_table_json_bytes(data: &[u8]) -> Result<Table, String> {
    serde_json::from_slice::<TableDisk>(data)
        .map_err(|e| format!("Failed to parse table JSON: {e}"))?
        .into_table()
}
