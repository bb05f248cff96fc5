use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use transcript_harvester::clients::{
    CaptionTrack, HttpClient, HttpResponse, LibraryError, MetadataExtractor, TranscriptLibrary,
    TranscriptSnippet, VideoCaptions,
};
use transcript_harvester::output::{invalid_input_path, FailureRecord};
use transcript_harvester::sources::{TimedTextSource, TranscriptApiSource, YtDlpSource};
use transcript_harvester::{BatchRunner, SourceChain, TranscriptError, VideoId};

const ENDPOINT: &str = "https://captions.test/api/timedtext";

/// Serves canned responses by exact URL and 404 for everything else
#[derive(Default)]
struct StubHttp {
    responses: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<String>>,
}

impl StubHttp {
    fn with(mut self, url: impl Into<String>, status: u16, body: &str) -> Self {
        self.responses.insert(url.into(), HttpResponse::new(status, body));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for StubHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, TranscriptError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(404, "")))
    }
}

struct StubLibrary {
    result: Result<Vec<TranscriptSnippet>, LibraryError>,
    calls: Mutex<usize>,
}

impl StubLibrary {
    fn new(result: Result<Vec<TranscriptSnippet>, LibraryError>) -> Self {
        Self {
            result,
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TranscriptLibrary for StubLibrary {
    async fn fetch_snippets(
        &self,
        _video_id: &str,
        _languages: &[String],
    ) -> Result<Vec<TranscriptSnippet>, LibraryError> {
        *self.calls.lock().unwrap() += 1;
        self.result.clone()
    }
}

struct StubExtractor {
    captions: VideoCaptions,
    calls: Mutex<usize>,
}

impl StubExtractor {
    fn new(captions: VideoCaptions) -> Self {
        Self {
            captions,
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
    async fn caption_tracks(&self, _video_id: &VideoId) -> Result<VideoCaptions, TranscriptError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.captions.clone())
    }
}

fn languages() -> Vec<String> {
    vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()]
}

fn timedtext_url(lang: &str, id: &str) -> String {
    format!("{}?lang={}&v={}&fmt=json3", ENDPOINT, lang, id)
}

fn chain(http: Arc<StubHttp>, library: Arc<StubLibrary>, extractor: Arc<StubExtractor>) -> SourceChain {
    SourceChain::new(languages())
        .with_source(Box::new(TimedTextSource::new(http.clone(), ENDPOINT, languages())))
        .with_source(Box::new(TranscriptApiSource::new(library, languages())))
        .with_source(Box::new(YtDlpSource::new(extractor, http, languages())))
}

fn not_found_library() -> Arc<StubLibrary> {
    Arc::new(StubLibrary::new(Err(LibraryError::NoTranscriptFound(
        "No transcripts were found".to_string(),
    ))))
}

fn artifacts(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs_err::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn write_input(dir: &Path, content: &str) -> std::path::PathBuf {
    let input = dir.join("videos.txt");
    fs_err::write(&input, content).unwrap();
    input
}

#[tokio::test]
async fn short_link_with_timedtext_hit_writes_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "https://youtu.be/abc1234567\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(StubHttp::default().with(
        timedtext_url("en", "abc1234567"),
        200,
        r#"{"events":[{"segs":[{"utf8":"Hello"}]}]}"#,
    ));
    let library = not_found_library();
    let extractor = Arc::new(StubExtractor::new(VideoCaptions::default()));

    let runner = BatchRunner::new(chain(http.clone(), library.clone(), extractor.clone()));
    let summary = runner.run(&input, &output).await.unwrap();

    assert_eq!(summary.transcripts, 1);
    assert_eq!(artifacts(&output), vec!["abc1234567.txt"]);
    assert_eq!(fs_err::read_to_string(output.join("abc1234567.txt")).unwrap(), "Hello");

    // later sources never ran
    assert_eq!(http.requests(), vec![timedtext_url("en", "abc1234567")]);
    assert_eq!(library.calls(), 0);
    assert_eq!(extractor.calls(), 0);
}

#[tokio::test]
async fn all_sources_not_available_writes_error_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "https://youtu.be/abc1234567\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(StubHttp::default());
    let library = not_found_library();
    let extractor = Arc::new(StubExtractor::new(VideoCaptions::default()));

    let runner = BatchRunner::new(chain(http, library.clone(), extractor.clone()));
    let summary = runner.run(&input, &output).await.unwrap();

    assert_eq!(summary.failures, 1);
    assert_eq!(artifacts(&output), vec!["abc1234567.error.json"]);
    assert_eq!(library.calls(), 1);
    assert_eq!(extractor.calls(), 1);

    let content = fs_err::read_to_string(output.join("abc1234567.error.json")).unwrap();
    assert!(content.ends_with('\n'));
    let record: FailureRecord = serde_json::from_str(&content).unwrap();
    assert_eq!(record.video_id, "abc1234567");
    assert_eq!(record.error_type, "not_available");
    assert!(record.message.contains("en-GB"));
}

#[tokio::test]
async fn blank_and_comment_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "\n# my playlist\n\nabc1234567\n   \n#xyz9876543\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(StubHttp::default());
    let runner = BatchRunner::new(chain(
        http,
        not_found_library(),
        Arc::new(StubExtractor::new(VideoCaptions::default())),
    ));
    let summary = runner.run(&input, &output).await.unwrap();

    assert_eq!(summary.processed(), 1);
    assert_eq!(artifacts(&output).len(), 1);
}

#[tokio::test]
async fn one_failure_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "https://www.youtube.com/watch?v=fails000001\nhttps://www.youtube.com/watch?v=works00002&t=10\n",
    );
    let output = dir.path().join("transcripts");

    let http = Arc::new(
        StubHttp::default()
            .with(timedtext_url("en", "fails000001"), 500, "boom")
            .with(
                timedtext_url("en-GB", "works00002"),
                200,
                r#"{"events":[{"segs":[{"utf8":"It"},{"utf8":" works"}]}]}"#,
            ),
    );

    let runner = BatchRunner::new(chain(
        http.clone(),
        not_found_library(),
        Arc::new(StubExtractor::new(VideoCaptions::default())),
    ));
    let summary = runner.run(&input, &output).await.unwrap();

    assert_eq!(summary.transcripts, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(
        artifacts(&output),
        vec!["fails000001.error.json", "works00002.txt"]
    );
    assert_eq!(
        fs_err::read_to_string(output.join("works00002.txt")).unwrap(),
        "It\nworks"
    );

    // ids are processed in input order
    let requests = http.requests();
    assert!(requests[0].contains("v=fails000001"));
    assert!(requests.last().unwrap().contains("v=works00002"));
}

#[tokio::test]
async fn download_failure_alone_is_reported_as_download_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "abc1234567\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(
        StubHttp::default()
            .with(timedtext_url("en", "abc1234567"), 503, "")
            .with("https://captions.test/auto.vtt", 500, ""),
    );
    let library = Arc::new(StubLibrary::new(Err(LibraryError::VideoUnavailable(
        "Video unavailable".to_string(),
    ))));
    let extractor = Arc::new(StubExtractor::new(VideoCaptions {
        automatic_captions: HashMap::from([(
            "en".to_string(),
            vec![CaptionTrack::new("vtt", "https://captions.test/auto.vtt")],
        )]),
        ..VideoCaptions::default()
    }));

    let runner = BatchRunner::new(chain(http, library, extractor));
    runner.run(&input, &output).await.unwrap();

    let record: FailureRecord =
        serde_json::from_str(&fs_err::read_to_string(output.join("abc1234567.error.json")).unwrap())
            .unwrap();
    assert_eq!(record.error_type, "download_failed");
    assert!(record.message.contains("auto.vtt"));
}

#[tokio::test]
async fn ytdlp_fallback_supplies_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "abc1234567\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(StubHttp::default().with(
        "https://captions.test/manual.srt",
        200,
        "1\n00:00:00,000 --> 00:00:01,000\nFrom the\nfallback\n",
    ));
    let extractor = Arc::new(StubExtractor::new(VideoCaptions {
        subtitles: HashMap::from([(
            "en-US".to_string(),
            vec![CaptionTrack::new("srt", "https://captions.test/manual.srt")],
        )]),
        ..VideoCaptions::default()
    }));

    let runner = BatchRunner::new(chain(http, not_found_library(), extractor.clone()));
    runner.run(&input, &output).await.unwrap();

    assert_eq!(extractor.calls(), 1);
    assert_eq!(
        fs_err::read_to_string(output.join("abc1234567.txt")).unwrap(),
        "From the\nfallback"
    );
}

#[tokio::test]
async fn unresolvable_line_is_recorded_and_batch_continues() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "https://youtu.be/\nabc1234567\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(StubHttp::default().with(
        timedtext_url("en", "abc1234567"),
        200,
        r#"{"events":[{"segs":[{"utf8":"ok"}]}]}"#,
    ));
    let runner = BatchRunner::new(chain(
        http,
        not_found_library(),
        Arc::new(StubExtractor::new(VideoCaptions::default())),
    ));
    let summary = runner.run(&input, &output).await.unwrap();

    assert_eq!(summary.transcripts, 1);
    assert_eq!(summary.failures, 1);
    let names = artifacts(&output);
    assert_eq!(names.len(), 2);
    assert_eq!(names[0], "abc1234567.txt");
    assert_eq!(
        output.join(&names[1]),
        invalid_input_path(&output, "https://youtu.be/")
    );
}

#[tokio::test]
async fn unresolvable_line_never_replaces_a_lookalike_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "abc1234567_\nabc1234567.\n");
    let output = dir.path().join("transcripts");

    let http = Arc::new(StubHttp::default().with(
        timedtext_url("en", "abc1234567_"),
        200,
        r#"{"events":[{"segs":[{"utf8":"still here"}]}]}"#,
    ));
    let runner = BatchRunner::new(chain(
        http,
        not_found_library(),
        Arc::new(StubExtractor::new(VideoCaptions::default())),
    ));
    let summary = runner.run(&input, &output).await.unwrap();

    assert_eq!(summary.transcripts, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(
        fs_err::read_to_string(output.join("abc1234567_.txt")).unwrap(),
        "still here"
    );
    assert!(invalid_input_path(&output, "abc1234567.").exists());
    assert!(!output.join("abc1234567_.error.json").exists());
}
