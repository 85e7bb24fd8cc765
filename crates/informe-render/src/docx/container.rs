//! Contenedor OPC (ZIP) mínimo.
//!
//! Sólo lo que el motor de plantillas necesita: leer un paquete existente
//! (entradas stored o deflate, tamaños tomados del directorio central) y
//! escribir uno nuevo con todas las entradas deflate. Sin ZIP64: los
//! documentos de este sistema están muy por debajo de esos límites.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};

use crate::error::RenderError;

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_DIR_SIG: u32 = 0x0201_4b50;
const EOCD_SIG: u32 = 0x0605_4b50;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// Paquete OPC en memoria: lista ordenada de (nombre de parte, bytes).
pub struct OpcContainer {
    entries: Vec<(String, Vec<u8>)>,
}

impl OpcContainer {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn read_from(path: &Path) -> Result<Self, RenderError> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_slice())
    }

    /// Inserta o reemplaza una parte conservando el orden de aparición.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = data;
        } else {
            self.entries.push((name.to_string(), data));
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    // ---------------- lectura ----------------

    pub fn parse(bytes: &[u8]) -> Result<Self, RenderError> {
        let eocd = find_eocd(bytes).ok_or_else(|| RenderError::Container("no se encontró el fin de directorio".into()))?;
        let total_entries = read_u16(bytes, eocd + 10)? as usize;
        let cd_offset = read_u32(bytes, eocd + 16)? as usize;

        let mut entries = Vec::with_capacity(total_entries);
        let mut pos = cd_offset;
        for _ in 0..total_entries {
            if read_u32(bytes, pos)? != CENTRAL_DIR_SIG {
                return Err(RenderError::Container("entrada de directorio central corrupta".into()));
            }
            let method = read_u16(bytes, pos + 10)?;
            let comp_size = read_u32(bytes, pos + 20)? as usize;
            let uncomp_size = read_u32(bytes, pos + 24)? as usize;
            let name_len = read_u16(bytes, pos + 28)? as usize;
            let extra_len = read_u16(bytes, pos + 30)? as usize;
            let comment_len = read_u16(bytes, pos + 32)? as usize;
            let local_offset = read_u32(bytes, pos + 42)? as usize;
            let name = String::from_utf8(slice(bytes, pos + 46, name_len)?.to_vec())
                .map_err(|_| RenderError::Container("nombre de parte no UTF-8".into()))?;

            // Saltar al dato real vía la cabecera local.
            if read_u32(bytes, local_offset)? != LOCAL_HEADER_SIG {
                return Err(RenderError::Container(format!("cabecera local corrupta para '{}'", name)));
            }
            let lh_name_len = read_u16(bytes, local_offset + 26)? as usize;
            let lh_extra_len = read_u16(bytes, local_offset + 28)? as usize;
            let data_start = local_offset + 30 + lh_name_len + lh_extra_len;
            let raw = slice(bytes, data_start, comp_size)?;

            let data = match method {
                METHOD_STORED => raw.to_vec(),
                METHOD_DEFLATE => {
                    let mut out = Vec::with_capacity(uncomp_size);
                    DeflateDecoder::new(raw).read_to_end(&mut out)
                                            .map_err(|e| {
                                                RenderError::Container(format!("inflate de '{}': {}", name, e))
                                            })?;
                    out
                }
                other => {
                    return Err(RenderError::Container(format!("método de compresión {} no soportado en '{}'",
                                                              other, name)))
                }
            };

            entries.push((name, data));
            pos += 46 + name_len + extra_len + comment_len;
        }

        Ok(Self { entries })
    }

    // ---------------- escritura ----------------

    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let mut out: Vec<u8> = Vec::new();
        let mut central: Vec<u8> = Vec::new();

        for (name, data) in &self.entries {
            let mut crc = Crc::new();
            crc.update(data);
            let crc32 = crc.sum();

            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)
                   .and_then(|_| encoder.finish())
                   .map(|compressed| {
                       let local_offset = out.len() as u32;
                       write_local_header(&mut out, name, crc32, compressed.len() as u32, data.len() as u32);
                       out.extend_from_slice(&compressed);
                       write_central_entry(&mut central,
                                           name,
                                           crc32,
                                           compressed.len() as u32,
                                           data.len() as u32,
                                           local_offset);
                   })
                   .map_err(|e| RenderError::Container(format!("deflate de '{}': {}", name, e)))?;
        }

        let cd_offset = out.len() as u32;
        let cd_size = central.len() as u32;
        out.extend_from_slice(&central);

        // EOCD
        push_u32(&mut out, EOCD_SIG);
        push_u16(&mut out, 0); // disco
        push_u16(&mut out, 0); // disco del directorio
        push_u16(&mut out, self.entries.len() as u16);
        push_u16(&mut out, self.entries.len() as u16);
        push_u32(&mut out, cd_size);
        push_u32(&mut out, cd_offset);
        push_u16(&mut out, 0); // comentario

        Ok(out)
    }
}

impl Default for OpcContainer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_local_header(out: &mut Vec<u8>, name: &str, crc32: u32, comp: u32, uncomp: u32) {
    push_u32(out, LOCAL_HEADER_SIG);
    push_u16(out, 20); // versión requerida
    push_u16(out, 0); // flags
    push_u16(out, METHOD_DEFLATE);
    push_u16(out, 0); // hora
    push_u16(out, 0x21); // fecha (1980-01-01)
    push_u32(out, crc32);
    push_u32(out, comp);
    push_u32(out, uncomp);
    push_u16(out, name.len() as u16);
    push_u16(out, 0); // extra
    out.extend_from_slice(name.as_bytes());
}

fn write_central_entry(out: &mut Vec<u8>, name: &str, crc32: u32, comp: u32, uncomp: u32, local_offset: u32) {
    push_u32(out, CENTRAL_DIR_SIG);
    push_u16(out, 20); // versión creadora
    push_u16(out, 20); // versión requerida
    push_u16(out, 0); // flags
    push_u16(out, METHOD_DEFLATE);
    push_u16(out, 0); // hora
    push_u16(out, 0x21); // fecha
    push_u32(out, crc32);
    push_u32(out, comp);
    push_u32(out, uncomp);
    push_u16(out, name.len() as u16);
    push_u16(out, 0); // extra
    push_u16(out, 0); // comentario
    push_u16(out, 0); // disco
    push_u16(out, 0); // atributos internos
    push_u32(out, 0); // atributos externos
    push_u32(out, local_offset);
    out.extend_from_slice(name.as_bytes());
}

fn find_eocd(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < 22 {
        return None;
    }
    let floor = bytes.len().saturating_sub(22 + 65_535);
    let mut pos = bytes.len() - 22;
    loop {
        if read_u32(bytes, pos).ok()? == EOCD_SIG {
            return Some(pos);
        }
        if pos == floor {
            return None;
        }
        pos -= 1;
    }
}

fn slice(bytes: &[u8], start: usize, len: usize) -> Result<&[u8], RenderError> {
    bytes.get(start..start + len)
         .ok_or_else(|| RenderError::Container("paquete truncado".into()))
}

fn read_u16(bytes: &[u8], pos: usize) -> Result<u16, RenderError> {
    let s = slice(bytes, pos, 2)?;
    Ok(u16::from_le_bytes([s[0], s[1]]))
}

fn read_u32(bytes: &[u8], pos: usize) -> Result<u32, RenderError> {
    let s = slice(bytes, pos, 4)?;
    Ok(u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
