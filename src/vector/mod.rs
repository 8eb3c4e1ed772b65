// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embeddings;
pub mod pinecone;
pub mod store;
pub mod types;

pub use embeddings::{Embedder, OpenAiEmbeddings};
pub use pinecone::{PineconeConfig, PineconeIndex, QueryMatch, VectorIndex};
pub use store::VectorStore;
pub use types::{Document, IndexConfig, VectorError};
