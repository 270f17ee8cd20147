use actix_web::{web, HttpMessage, HttpRequest};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{auth::Claims, graphql::Schema};

/// Executes a GraphQL request with the caller's claims in the context.
pub async fn graphql_handler(
    schema: web::Data<Schema>,
    req: HttpRequest,
    gql_request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = gql_request.into_inner();
    if let Some(claims) = req.extensions().get::<Claims>() {
        request = request.data(claims.clone());
    }
    schema.execute(request).await.into()
}
