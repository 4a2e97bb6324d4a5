//! Runtime module imported by generated service clients.

pub(crate) const TWIRP_RUNTIME: &str = r#"/* tslint:disable */
/* eslint-disable */

// Code generated by protots. DO NOT EDIT.

export type Fetch = (input: RequestInfo, init?: RequestInit) => Promise<Response>

export class TwirpError extends Error {
  public code: string
  public meta: { [key: string]: string }

  constructor(code: string, msg: string, meta: { [key: string]: string } = {}) {
    super(msg)
    this.code = code
    this.meta = meta
  }
}

export const createTwirpRequest = (params: object, headers: object = {}): RequestInit => {
  return {
    method: 'POST',
    headers: { ...headers, 'Content-Type': 'application/json' },
    body: JSON.stringify(params)
  }
}

export const throwTwirpError = (res: Response): Promise<never> => {
  return res.json().then(
    (err) => {
      throw new TwirpError(err.code || 'internal', err.msg || res.statusText, err.meta)
    },
    () => {
      throw new TwirpError('internal', res.statusText)
    }
  )
}
"#;
