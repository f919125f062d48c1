use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::models::{ApprovalStatus, ClientProfile, TeacherProfile};
use crate::notify::{self, Notification, Notifier};
use crate::repository::ProfileRepository;
use crate::storage::Storage;
use crate::wizard::{ProfileDraft, validate_all};

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherProfileForm {
    pub full_name: String,
    pub headline: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            profiles,
            storage,
            notifier,
        }
    }

    pub async fn client_profile(&self, user_id: &str) -> Result<ClientProfile, AppError> {
        self.profiles.find_client(user_id).await?.ok_or(AppError::NotFound)
    }

    /// Saves a completed onboarding wizard.
    pub async fn submit(&self, user_id: &str, draft: &ProfileDraft) -> Result<ClientProfile, AppError> {
        validate_all(draft)?;
        let profile = draft.to_profile(user_id);
        self.profiles.save_client(&profile).await?;
        info!("client profile for {} saved ({}% complete)", user_id, profile.completion);

        notify::send(
            self.notifier.as_ref(),
            Notification::success("Profile saved", "Your learning profile is up to date.")
                .with_redirect("/me/dashboard"),
        )
        .await;
        Ok(profile)
    }

    pub async fn teacher_profile(&self, user_id: &str) -> Result<TeacherProfile, AppError> {
        self.profiles.find_teacher(user_id).await?.ok_or(AppError::NotFound)
    }

    pub async fn save_teacher(&self, user_id: &str, form: TeacherProfileForm) -> Result<TeacherProfile, AppError> {
        let existing = self.profiles.find_teacher(user_id).await?;
        let profile = TeacherProfile {
            user_id: user_id.to_string(),
            full_name: form.full_name.trim().to_string(),
            headline: form.headline.trim().to_string(),
            subjects: form.subjects,
            document_path: existing.as_ref().and_then(|p| p.document_path.clone()),
            approval: existing.map(|p| p.approval).unwrap_or(ApprovalStatus::Pending),
            updated_at: Utc::now(),
        };
        if profile.full_name.is_empty() {
            return Err(AppError::BadRequest("full_name is required".to_string()));
        }
        self.profiles.save_teacher(&profile).await?;
        Ok(profile)
    }

    /// Stores a verification document and points the profile at it. The
    /// profile is only touched once the file is stored; a new document sends
    /// the profile back to review.
    pub async fn upload_document(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<TeacherProfile, AppError> {
        let mut profile = self.teacher_profile(user_id).await?;
        let name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::BadRequest(format!("invalid file name {:?}", file_name)))?;

        let key = format!("teachers/{}/{}", user_id, name);
        self.storage.put(&key, bytes).await?;

        profile.document_path = Some(key);
        profile.approval = ApprovalStatus::Pending;
        profile.updated_at = Utc::now();
        self.profiles.save_teacher(&profile).await?;
        info!("teacher {} uploaded document {}", user_id, name);

        notify::send(
            self.notifier.as_ref(),
            Notification::info("Document received", "We will review it shortly."),
        )
        .await;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::repository::MemoryStore;
    use crate::storage::MemoryStorage;
    use crate::wizard::profile::{AvailabilityStep, PersonalStep, PreferencesStep};

    struct FullDisk;

    #[async_trait]
    impl Storage for FullDisk {
        async fn put(&self, _: &str, _: &[u8]) -> Result<(), AppError> {
            Err(AppError::Storage("no space left".to_string()))
        }
        async fn get(&self, _: &str) -> Result<Option<Vec<u8>>, AppError> {
            Ok(None)
        }
        async fn delete(&self, _: &str) -> Result<bool, AppError> {
            Ok(false)
        }
        fn url(&self, path: &str) -> String {
            path.to_string()
        }
    }

    fn service(storage: Arc<dyn Storage>) -> (ProfileService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(crate::notify::RecordingNotifier::new());
        (ProfileService::new(store.clone(), storage, notifier), store)
    }

    fn form() -> TeacherProfileForm {
        TeacherProfileForm {
            full_name: "Sarah Johnson".to_string(),
            headline: "Full-stack developer".to_string(),
            subjects: vec!["programming".to_string()],
        }
    }

    #[tokio::test]
    async fn test_submit_profile_wizard() {
        let (service, _) = service(Arc::new(MemoryStorage::new()));
        let draft = ProfileDraft {
            personal: PersonalStep {
                full_name: "Jamie Park".to_string(),
                phone: "555-0100".to_string(),
                bio: None,
            },
            preferences: PreferencesStep {
                subjects: vec!["design".to_string()],
                goals: "Build a portfolio this spring".to_string(),
            },
            availability: AvailabilityStep {
                days: vec!["Mon".to_string(), "Thu".to_string()],
            },
        };

        let saved = service.submit("client-5", &draft).await.unwrap();
        assert_eq!(saved.completion, 83);
        assert_eq!(service.client_profile("client-5").await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_invalid_profile_wizard_is_rejected() {
        let (service, _) = service(Arc::new(MemoryStorage::new()));
        let err = service.submit("client-5", &ProfileDraft::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(matches!(
            service.client_profile("client-5").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_upload_document_updates_reference() {
        let storage = Arc::new(MemoryStorage::new());
        let (service, _) = service(storage.clone());
        service.save_teacher("teacher-1", form()).await.unwrap();

        let profile = service
            .upload_document("teacher-1", "diploma.pdf", b"%PDF")
            .await
            .unwrap();
        assert_eq!(profile.document_path.as_deref(), Some("teachers/teacher-1/diploma.pdf"));
        assert!(storage.get("teachers/teacher-1/diploma.pdf").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_profile_untouched() {
        let (service, store) = service(Arc::new(FullDisk));
        let before = service.save_teacher("teacher-1", form()).await.unwrap();

        let err = service
            .upload_document("teacher-1", "diploma.pdf", b"%PDF")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));

        let after = ProfileRepository::find_teacher(store.as_ref(), "teacher-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after, before);
    }
}
