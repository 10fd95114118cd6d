use crate::error::RemindError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_api_structs::delete_contact_method::*;
use remind_domain::{ContactMethod, ID};
use remind_infra::RemindContext;

pub async fn delete_contact_method_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<RemindContext>,
) -> Result<HttpResponse, RemindError> {
    let user_id = protect_route(&http_req)?;

    let usecase = DeleteContactMethodUseCase {
        user_id,
        contact_method_id: path_params.contact_method_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|contact_method| HttpResponse::Ok().json(APIResponse::new(contact_method)))
        .map_err(RemindError::from)
}

/// Reminders pointing at the deleted contact method are not touched.
/// When one of them fires, its delivery is dropped as undeliverable.
#[derive(Debug)]
pub struct DeleteContactMethodUseCase {
    pub user_id: ID,
    pub contact_method_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for RemindError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(contact_method_id) => Self::NotFound(format!(
                "The contact method with id: {}, was not found.",
                contact_method_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteContactMethodUseCase {
    type Response = ContactMethod;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteContactMethod";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.contact_methods.find(&self.contact_method_id).await {
            Some(contact_method) if contact_method.user_id == self.user_id => ctx
                .repos
                .contact_methods
                .delete(&self.contact_method_id)
                .await
                .ok_or_else(|| UseCaseError::NotFound(self.contact_method_id.clone())),
            _ => Err(UseCaseError::NotFound(self.contact_method_id.clone())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::contact_method::create_contact_method::CreateContactMethodUseCase;
    use remind_domain::Channel;
    use remind_infra::setup_context_inmemory;

    #[tokio::test]
    async fn deletes_own_contact_method() {
        let infra = setup_context_inmemory();
        let user_id = ID::default();
        let mut create = CreateContactMethodUseCase {
            user_id: user_id.clone(),
            channel: Channel::Email("alice@example.com".into()),
            description: Default::default(),
        };
        let contact_method = create.execute(&infra.ctx).await.unwrap();

        let mut usecase = DeleteContactMethodUseCase {
            user_id,
            contact_method_id: contact_method.id.clone(),
        };
        usecase.execute(&infra.ctx).await.unwrap();

        assert!(infra
            .ctx
            .repos
            .contact_methods
            .find(&contact_method.id)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn rejects_contact_method_owned_by_other_user() {
        let infra = setup_context_inmemory();
        let mut create = CreateContactMethodUseCase {
            user_id: ID::default(),
            channel: Channel::Email("alice@example.com".into()),
            description: Default::default(),
        };
        let contact_method = create.execute(&infra.ctx).await.unwrap();

        let mut usecase = DeleteContactMethodUseCase {
            user_id: ID::default(),
            contact_method_id: contact_method.id.clone(),
        };

        let res = usecase.execute(&infra.ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::NotFound(contact_method.id.clone())
        );
        assert!(infra
            .ctx
            .repos
            .contact_methods
            .find(&contact_method.id)
            .await
            .is_some());
    }
}
