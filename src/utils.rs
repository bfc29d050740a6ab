pub mod io {
    use std::{fs, str::Chars};

    use crate::error;

    type SourceId = u32;

    #[derive(Debug)]
    pub struct Source {
        id: SourceId,
        src_origin: String,
        src_content: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Pos {
        pub line: u32,
        pub column: u32,
        pub src_id: SourceId,
    }

    #[derive(Default)]
    pub struct SourceManager {
        sources: Vec<Source>,
    }

    impl Pos {
        pub fn start(src_id: SourceId) -> Self {
            Self {
                line: 0,
                column: 0,
                src_id,
            }
        }
    }

    impl Source {
        pub fn id(&self) -> SourceId {
            self.id
        }

        pub fn char_stream(&self) -> Chars<'_> {
            self.src_content.chars()
        }

        pub fn get_origin(&self) -> &String {
            &self.src_origin
        }
    }

    impl SourceManager {
        pub fn new() -> Self {
            Self { sources: vec![] }
        }

        pub fn get_source(&self, id: SourceId) -> Option<&Source> {
            self.sources.get(id as usize)
        }

        pub fn get_line(&self, pos: &Pos) -> Option<String> {
            self.get_source(pos.src_id)
                .and_then(|src| src.src_content.lines().nth(pos.line as usize))
                .map(str::to_string)
        }

        fn push_source(&mut self, origin: String, content: String) -> &Source {
            let id = self.sources.len() as SourceId;
            self.sources.push(Source {
                id,
                src_origin: origin,
                src_content: content,
            });
            &self.sources[id as usize]
        }

        pub fn load_source_file(&mut self, file_path: &str) -> Result<&Source, error::Error> {
            match fs::read_to_string(file_path) {
                Ok(content) => Ok(self.push_source(file_path.to_string(), content)),
                Err(_) => error::Error::file_read_error(file_path).err(),
            }
        }

        pub fn load_source_string(&mut self, source: &str) -> Result<&Source, error::Error> {
            let origin = format!("<input:{}>", self.sources.len());
            Ok(self.push_source(origin, source.to_string()))
        }
    }
}
