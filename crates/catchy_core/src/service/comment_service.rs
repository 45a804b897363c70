//! Task comment use-case service.

use crate::model::comment::TaskComment;
use crate::model::user::UserContext;
use crate::repo::comment_repo::{CommentAuthor, CommentRepository};
use crate::service::{ServiceError, ServiceResult};
use log::info;

pub struct CommentService<C> {
    comments: C,
}

impl<C: CommentRepository> CommentService<C> {
    pub fn new(comments: C) -> Self {
        Self { comments }
    }

    /// Adds a comment authored by `user` to one of the user's own tasks.
    pub fn add_comment(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
        text: &str,
    ) -> ServiceResult<TaskComment> {
        let user_name = user.author_name();
        let author = CommentAuthor {
            user_id: &user.user_id,
            user_name: &user_name,
        };
        let comment_id =
            self.comments
                .add_comment(&user.user_id, project_id, task_id, &author, text)?;
        info!("event=comment_add module=service status=ok task_id={task_id} comment_id={comment_id}");

        self.comments
            .list_comments(&user.user_id, project_id, task_id)?
            .into_iter()
            .find(|comment| comment.id == comment_id)
            .ok_or(ServiceError::InconsistentState(
                "created comment not found in read-back",
            ))
    }

    /// Lists a task's comments, newest first.
    pub fn list_comments(
        &self,
        user: &UserContext,
        project_id: &str,
        task_id: &str,
    ) -> ServiceResult<Vec<TaskComment>> {
        Ok(self
            .comments
            .list_comments(&user.user_id, project_id, task_id)?)
    }
}
