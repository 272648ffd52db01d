//! Source material for document drafts.

use std::sync::Arc;

use kseb_core::{BackendPort, ChatContext, CoreError};

use crate::research::Researcher;
use crate::transcript::channel_transcript;

/// Collects the channel transcript, web research and paper summaries for a
/// topic.
pub struct Gatherer {
    backend: Arc<dyn BackendPort>,
    web: Arc<dyn Researcher>,
    papers: Arc<dyn Researcher>,
}

/// Raw material from the three sources.
struct Material {
    transcript: String,
    web: Result<String, CoreError>,
    papers: Result<String, CoreError>,
}

impl Gatherer {
    pub fn new(
        backend: Arc<dyn BackendPort>,
        web: Arc<dyn Researcher>,
        papers: Arc<dyn Researcher>,
    ) -> Self {
        Self {
            backend,
            web,
            papers,
        }
    }

    async fn collect(&self, web_query: &str, paper_query: &str, ctx: &ChatContext) -> Material {
        let (transcript, web, papers) = tokio::join!(
            channel_transcript(self.backend.as_ref(), ctx),
            self.web.research(web_query),
            self.papers.research(paper_query),
        );

        let transcript = match transcript {
            Ok(Some(text)) => text,
            Ok(None) => "채널에 대화 내용이 없습니다.".to_string(),
            Err(message) => message,
        };
        Material {
            transcript,
            web,
            papers,
        }
    }

    /// Material for a report. Failed sources are described inline.
    pub async fn report_material(&self, topic: &str, ctx: &ChatContext) -> String {
        let web_query = format!("{topic}에 대한 최신 동향, 통계, 주요 사례 분석");
        let material = self.collect(&web_query, topic, ctx).await;

        let web = material.web.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Web research failed");
            format!("웹 검색에 실패했습니다: {e}")
        });
        let papers = material.papers.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Paper research failed");
            format!("논문 검색에 실패했습니다: {e}")
        });

        combine("문서 주제", topic, &material.transcript, &web, &papers)
    }

    /// Material for a presentation. Any research failure aborts.
    pub async fn deck_material(&self, topic: &str, ctx: &ChatContext) -> Result<String, CoreError> {
        let web_query = format!("{topic}에 대한 발표 자료");
        let material = self.collect(&web_query, topic, ctx).await;
        let web = material.web?;
        let papers = material.papers?;
        Ok(combine("발표 주제", topic, &material.transcript, &web, &papers))
    }
}

fn combine(label: &str, topic: &str, transcript: &str, web: &str, papers: &str) -> String {
    format!(
        "{label}: {topic}\n\n\
         [채널 대화 내용 요약]:\n{transcript}\n\n\
         [웹 리서치 결과]:\n{web}\n\n\
         [학술 논문 정보]:\n{papers}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_layout() {
        let text = combine("문서 주제", "AI", "t", "w", "p");
        assert_eq!(
            text,
            "문서 주제: AI\n\n[채널 대화 내용 요약]:\nt\n\n[웹 리서치 결과]:\nw\n\n[학술 논문 정보]:\np"
        );
    }
}
