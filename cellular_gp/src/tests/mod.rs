mod common;
mod test_stream;
