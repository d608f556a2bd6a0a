use crate::validate::SelectedFile;

/// A bounded group of valid files sent together in one request.
/// Batch numbers are 1-based so they can appear in user-facing messages as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub number: u32,
    pub files: Vec<SelectedFile>,
}

/// Partition valid files into batches of at most `batch_size`, preserving
/// order. The last batch may be smaller; ceil(N/B) batches overall.
pub fn into_batches(files: Vec<SelectedFile>, batch_size: usize) -> Vec<UploadBatch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(files.len().div_ceil(batch_size));
    let mut files = files.into_iter();
    loop {
        let chunk: Vec<SelectedFile> = files.by_ref().take(batch_size).collect();
        if chunk.is_empty() {
            break;
        }
        batches.push(UploadBatch {
            number: batches.len() as u32 + 1,
            files: chunk,
        });
    }
    batches
}
