//! The upload of a single file.
//!
//! [`upload_file`] performs four api calls, each one depending on the result of the
//! previous one:
//!
//! 1. [`AuthorizeAccount`] turns the key pair into a [`B2Authorization`].
//! 2. [`ListBuckets`] resolves the bucket name to a [`Bucket`].
//! 3. [`GetUploadUrl`] fetches an [`UploadUrl`] for that bucket.
//! 4. [`UploadFile`] sends the file contents.
//!
//! Reading the local file and computing its sha1 does not depend on any of the first
//! three calls, so it runs concurrently with them. The first failure aborts everything.
//!
//! [`upload_file`]: fn.upload_file.html
//! [`AuthorizeAccount`]: ../auth/struct.AuthorizeAccount.html
//! [`B2Authorization`]: ../auth/struct.B2Authorization.html
//! [`ListBuckets`]: ../buckets/struct.ListBuckets.html
//! [`Bucket`]: ../buckets/struct.Bucket.html
//! [`GetUploadUrl`]: ../files/upload/struct.GetUploadUrl.html
//! [`UploadUrl`]: ../files/upload/struct.UploadUrl.html
//! [`UploadFile`]: ../files/upload/struct.UploadFile.html

use std::path::Path;

use bytes::Bytes;
use futures::try_join;
use tracing::{debug, info};

use crate::auth::B2Authorization;
use crate::buckets::{Bucket, ListBuckets};
use crate::client::{B2Client, Transport};
use crate::config::Config;
use crate::encoding::encode_file_name;
use crate::files::upload::{sha1_hex, GetUploadUrl, UploadFile, UploadUrl, UploadedFile};
use crate::B2Error;

/// Upload the file described by the config and return the record backblaze created.
pub async fn upload_file<T: Transport>(
    client: &B2Client<T>,
    config: &Config,
) -> Result<UploadedFile, B2Error> {
    let (url, (data, sha1)) = try_join!(upload_url(client, config), read_file(&config.file))?;

    let file_name = encode_file_name(&config.upload_key);
    debug!(%file_name, content_type = %config.content_type, "uploading file");
    let uploaded = client
        .send(UploadFile::new(
            &url,
            &file_name,
            &config.content_type,
            &sha1,
            data,
        ))
        .await?;
    info!(file_name = %config.upload_key, %sha1, "upload complete");
    Ok(uploaded)
}

/// Authorize, resolve the bucket and fetch an upload url.
async fn upload_url<T: Transport>(
    client: &B2Client<T>,
    config: &Config,
) -> Result<UploadUrl, B2Error> {
    let credentials = config.credentials();
    let auth = client.send(credentials.authorize()).await?;
    info!(account_id = %auth.account_id, "authorized");

    let bucket = resolve_bucket(client, &auth, &config.bucket).await?;
    info!(bucket = %config.bucket, bucket_id = %bucket.bucket_id, "resolved bucket");

    client
        .send(GetUploadUrl::new(&auth, &bucket.bucket_id))
        .await
}

/// Look up a bucket by name.
///
/// The first bucket in the listing is used. An empty listing is reported as
/// [`B2Error::BucketNotFound`].
///
/// [`B2Error::BucketNotFound`]: ../enum.B2Error.html#variant.BucketNotFound
pub async fn resolve_bucket<T: Transport>(
    client: &B2Client<T>,
    auth: &B2Authorization,
    bucket_name: &str,
) -> Result<Bucket, B2Error> {
    let buckets = client
        .send(ListBuckets::new(auth).bucket_name(bucket_name))
        .await?;
    buckets
        .into_iter()
        .next()
        .ok_or_else(|| B2Error::BucketNotFound(bucket_name.to_string()))
}

/// Read the whole file and compute its sha1.
pub async fn read_file(path: &Path) -> Result<(Bytes, String), B2Error> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| B2Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let sha1 = sha1_hex(&data);
    debug!(path = %path.display(), len = data.len(), %sha1, "read file");
    Ok((Bytes::from(data), sha1))
}

#[cfg(test)]
mod tests {
    use super::read_file;
    use crate::B2Error;
    use std::io::Write;

    #[tokio::test]
    async fn empty_file_digest() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (data, sha1) = read_file(file.path()).await.unwrap();
        assert!(data.is_empty());
        assert_eq!(sha1, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[tokio::test]
    async fn file_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let (data, sha1) = read_file(file.path()).await.unwrap();
        assert_eq!(&data[..], b"abc");
        assert_eq!(sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[tokio::test]
    async fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.bin");
        match read_file(&path).await {
            Err(err @ B2Error::ReadFile { .. }) => {
                assert!(err.to_string().contains("nope.bin"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
