use std::io::Cursor;

use axum::body::StreamBody;
use tokio_util::io::ReaderStream;

pub trait IntoBody<T> {
    fn into_body(self) -> StreamBody<ReaderStream<Cursor<T>>>;
}

impl IntoBody<&'static str> for &'static str {
    fn into_body(self) -> StreamBody<ReaderStream<Cursor<&'static str>>> {
        StreamBody::new(ReaderStream::new(Cursor::new(self)))
    }
}

impl IntoBody<String> for String {
    fn into_body(self) -> StreamBody<ReaderStream<Cursor<String>>> {
        StreamBody::new(ReaderStream::new(Cursor::new(self)))
    }
}

impl IntoBody<Vec<u8>> for Vec<u8> {
    fn into_body(self) -> StreamBody<ReaderStream<Cursor<Vec<u8>>>> {
        StreamBody::new(ReaderStream::new(Cursor::new(self)))
    }
}
