// src/lexer/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
    time::Instant,
};

use serde::{Deserialize, Serialize};

use crate::automaton::{Dfa, DfaNode, REJECT};

// -------------------- JSON (de)serialization --------------------

#[derive(Serialize, Deserialize)]
struct NodeDisk {
    label: i64,
    /// `null` marks a reject.
    links: Vec<Option<u32>>,
}

#[derive(Serialize, Deserialize)]
struct DfaDisk {
    num_items: usize,
    nodes: Vec<NodeDisk>,
}

impl From<&Dfa> for DfaDisk {
    fn from(d: &Dfa) -> Self {
        let n = d.num_nodes() as u32;
        Self {
            num_items: d.num_items,
            nodes: d
                .nodes
                .iter()
                .map(|node| NodeDisk {
                    label: node.label,
                    links: node
                        .links
                        .iter()
                        .map(|&l| (l < n).then_some(l))
                        .collect(),
                })
                .collect(),
        }
    }
}

impl DfaDisk {
    fn into_dfa(self) -> Result<Dfa, String> {
        let mut dfa = Dfa::new(self.num_items);
        for (i, node) in self.nodes.into_iter().enumerate() {
            if node.links.len() != self.num_items {
                return Err(format!(
                    "node {i} has {} links, expected {}",
                    node.links.len(),
                    self.num_items
                ));
            }
            dfa.nodes.push(DfaNode {
                links: node.links.iter().map(|l| l.unwrap_or(REJECT)).collect(),
                label: node.label,
                state: None,
            });
        }
        Ok(dfa)
    }
}

pub fn save_dfa_json(path: &Path, dfa: &Dfa) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &DfaDisk::from(dfa))?;
    w.flush()
}

pub fn load_dfa_json_bytes(data: &[u8]) -> Result<Dfa, String> {
    serde_json::from_slice::<DfaDisk>(data)
        .map_err(|e| format!("Failed to parse DFA JSON: {e}"))?
        .into_dfa()
}

// -------------------- Compact binary --------------------
//
// magic, u32 num_nodes, u32 num_items, then per node: i64 label, num_items x u32 links.
// All little-endian; u32::MAX is a reject.

const BIN_MAGIC: &[u8; 8] = b"LRXDFA01";

pub fn save_dfa_bin(path: &Path, dfa: &Dfa) -> std::io::Result<()> {
    let instant = Instant::now();
    let invalid = |what: &str| std::io::Error::new(std::io::ErrorKind::InvalidData, what.to_string());
    let num_nodes = u32::try_from(dfa.num_nodes()).map_err(|_| invalid("num_nodes > u32::MAX"))?;
    let num_items = u32::try_from(dfa.num_items).map_err(|_| invalid("num_items > u32::MAX"))?;

    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    w.write_all(BIN_MAGIC)?;
    w.write_all(&num_nodes.to_le_bytes())?;
    w.write_all(&num_items.to_le_bytes())?;

    let mut row = vec![0u8; dfa.num_items * 4];
    for node in &dfa.nodes {
        w.write_all(&node.label.to_le_bytes())?;
        for (i, &l) in node.links.iter().enumerate() {
            row[i * 4..i * 4 + 4].copy_from_slice(&l.to_le_bytes());
        }
        w.write_all(&row)?;
    }

    let flush = w.flush();
    log::debug!(
        "[lexer::io] saved {} nodes to {} in {} ms",
        num_nodes,
        path.display(),
        instant.elapsed().as_millis()
    );
    flush
}

pub fn load_dfa_bin_bytes(mut data: &[u8]) -> Result<Dfa, String> {
    if data.len() < 8 + 4 + 4 {
        return Err("bin too short".into());
    }
    if &data[..8] != BIN_MAGIC {
        return Err("bad magic in DFA .bin".into());
    }
    data = &data[8..];

    let read_u32 = |buf: &mut &[u8]| -> Result<u32, String> {
        if buf.len() < 4 {
            return Err("truncated u32".into());
        }
        let mut le = [0u8; 4];
        le.copy_from_slice(&buf[..4]);
        *buf = &buf[4..];
        Ok(u32::from_le_bytes(le))
    };
    let read_i64 = |buf: &mut &[u8]| -> Result<i64, String> {
        if buf.len() < 8 {
            return Err("truncated i64".into());
        }
        let mut le = [0u8; 8];
        le.copy_from_slice(&buf[..8]);
        *buf = &buf[8..];
        Ok(i64::from_le_bytes(le))
    };

    let num_nodes = read_u32(&mut data)? as usize;
    let num_items = read_u32(&mut data)? as usize;
    let expected = num_nodes
        .checked_mul(8 + num_items * 4)
        .ok_or("num_nodes * row size overflow")?;
    if data.len() < expected {
        return Err(format!(
            "truncated DFA body: {} bytes, expected {expected}",
            data.len()
        ));
    }

    let mut dfa = Dfa::new(num_items);
    for _ in 0..num_nodes {
        let label = read_i64(&mut data)?;
        let mut links = Vec::with_capacity(num_items);
        for _ in 0..num_items {
            links.push(read_u32(&mut data)?);
        }
        dfa.nodes.push(DfaNode {
            links,
            label,
            state: None,
        });
    }
    Ok(dfa)
}
